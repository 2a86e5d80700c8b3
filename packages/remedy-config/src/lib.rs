mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Artifacts, Config, Relay, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, path.parent());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for origin in &cfg.service.cors_allowed_origins {
		let origin = origin.trim();

		if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
			return Err(Error::Validation {
				message: format!(
					"service.cors_allowed_origins entry {origin:?} must be \"*\" or an http or https origin."
				),
			});
		}
	}

	for (label, path) in [
		("artifacts.feature_schema", &cfg.artifacts.feature_schema),
		("artifacts.encoder", &cfg.artifacts.encoder),
		("artifacts.classifier", &cfg.artifacts.classifier),
		("artifacts.medicine_table", &cfg.artifacts.medicine_table),
	] {
		if path.as_os_str().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	let upstream_url = cfg.relay.upstream_url.trim();

	if !(upstream_url.starts_with("http://") || upstream_url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "relay.upstream_url must be an http or https URL.".to_string(),
		});
	}
	if cfg.relay.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "relay.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config, base_dir: Option<&Path>) {
	if cfg.relay.idle_timeout_ms == Some(0) {
		cfg.relay.idle_timeout_ms = None;
	}

	cfg.relay.upstream_url = cfg.relay.upstream_url.trim().to_string();

	for origin in &mut cfg.service.cors_allowed_origins {
		*origin = origin.trim().trim_end_matches('/').to_string();
	}

	let Some(base_dir) = base_dir else {
		return;
	};

	for path in [
		&mut cfg.artifacts.feature_schema,
		&mut cfg.artifacts.encoder,
		&mut cfg.artifacts.classifier,
		&mut cfg.artifacts.medicine_table,
	] {
		if path.is_relative() && !path.as_os_str().is_empty() {
			*path = base_dir.join(&*path);
		}
	}
}
