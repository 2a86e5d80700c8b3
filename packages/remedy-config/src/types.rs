use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub artifacts: Artifacts,
	pub relay: Relay,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Browser origins allowed to call the API. `"*"` allows any origin.
	#[serde(default = "default_cors_allowed_origins")]
	pub cors_allowed_origins: Vec<String>,
}

/// Locations of the pre-built artifacts the service loads at startup.
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifacts {
	/// JSON array of feature names, in training order.
	pub feature_schema: PathBuf,
	/// Fitted ordinal encoder for the categorical fields.
	pub encoder: PathBuf,
	/// Classifier weights, feature order and class labels.
	pub classifier: PathBuf,
	/// Static medicine reference table keyed by disease.
	pub medicine_table: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relay {
	pub upstream_url: String,
	#[serde(default = "default_connect_timeout_ms")]
	pub connect_timeout_ms: u64,
	/// Maximum wait for the next upstream chunk. Zero or absent means no limit.
	#[serde(default)]
	pub idle_timeout_ms: Option<u64>,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_cors_allowed_origins() -> Vec<String> {
	vec!["http://localhost:3000".to_string()]
}

fn default_connect_timeout_ms() -> u64 {
	5_000
}
