mod error;

pub mod upstream;

pub use error::{Error, Result};
pub use upstream::{UpstreamServer, UpstreamStep};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{Value, json};

pub const FEATURE_SCHEMA_FILE: &str = "feature_names.json";
pub const ENCODER_FILE: &str = "ordinal_encoder.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const MEDICINE_TABLE_FILE: &str = "medicine_table.json";

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct TempDir {
	path: PathBuf,
}
impl TempDir {
	pub fn new(prefix: &str) -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System time is before the epoch: {err}.")))?
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let path = env::temp_dir().join(format!("{prefix}_{nanos}_{pid}_{ordinal}"));

		fs::create_dir_all(&path)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempDir {
	fn drop(&mut self) {
		if let Err(err) = fs::remove_dir_all(&self.path) {
			eprintln!("Temp dir cleanup failed for {:?}: {err}.", self.path);
		}
	}
}

/// A complete, coherent artifact set written to a temp directory.
pub struct ArtifactFixture {
	dir: TempDir,
}
impl ArtifactFixture {
	pub fn write() -> Result<Self> {
		let fixture = Self { dir: TempDir::new("remedy_artifacts")? };

		fixture.write_file(FEATURE_SCHEMA_FILE, &feature_schema())?;
		fixture.write_file(ENCODER_FILE, &encoder())?;
		fixture.write_file(CLASSIFIER_FILE, &classifier())?;
		fixture.write_file(MEDICINE_TABLE_FILE, &medicine_table())?;

		Ok(fixture)
	}

	pub fn dir(&self) -> &Path {
		self.dir.path()
	}

	/// Replaces one artifact file, e.g. to exercise load failures.
	pub fn write_file(&self, name: &str, value: &Value) -> Result<PathBuf> {
		let path = self.dir.path().join(name);

		fs::write(&path, serde_json::to_vec_pretty(value)?)?;

		Ok(path)
	}

	pub fn config(&self) -> remedy_config::Artifacts {
		remedy_config::Artifacts {
			feature_schema: self.dir.path().join(FEATURE_SCHEMA_FILE),
			encoder: self.dir.path().join(ENCODER_FILE),
			classifier: self.dir.path().join(CLASSIFIER_FILE),
			medicine_table: self.dir.path().join(MEDICINE_TABLE_FILE),
		}
	}
}

pub fn service_config(
	artifacts: remedy_config::Artifacts,
	upstream_url: impl Into<String>,
) -> remedy_config::Config {
	remedy_config::Config {
		service: remedy_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			cors_allowed_origins: vec!["http://localhost:3000".to_string()],
		},
		artifacts,
		relay: remedy_config::Relay {
			upstream_url: upstream_url.into(),
			connect_timeout_ms: 1_000,
			idle_timeout_ms: None,
		},
	}
}

pub fn feature_schema() -> Value {
	json!([
		"symptom_fever",
		"symptom_cough",
		"symptom_headache",
		"symptom_runny_nose",
		"symptom_chest_pain",
		"healthfactor_smoker",
		"healthfactor_asthma",
		"ageGroup",
		"severity"
	])
}

pub fn encoder() -> Value {
	json!({
		"fields": {
			"ageGroup": { "child": 0.0, "adult": 1.0, "senior": 2.0 },
			"severity": { "mild": 0.0, "moderate": 1.0, "severe": 2.0 }
		}
	})
}

/// Softmax weights whose column order deliberately differs from [`feature_schema`].
pub fn classifier() -> Value {
	json!({
		"feature_names": [
			"ageGroup",
			"severity",
			"symptom_fever",
			"symptom_cough",
			"symptom_headache",
			"symptom_runny_nose",
			"symptom_chest_pain",
			"healthfactor_smoker",
			"healthfactor_asthma"
		],
		"classes": ["Flu", "Common Cold", "Migraine", "Bronchitis"],
		"coefficients": [
			[0.0, 0.2, 3.0, 0.5, 0.3, 0.2, 0.0, 0.0, 0.0],
			[0.0, -0.2, 0.3, 1.0, 0.2, 3.0, 0.0, 0.0, 0.0],
			[0.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0],
			[0.1, 0.1, 0.2, 1.5, 0.0, 0.0, 1.5, 2.0, 1.0]
		],
		"intercepts": [0.0, 0.0, 0.0, -0.5]
	})
}

/// Reference rows for Flu and Migraine only; Bronchitis deliberately has none.
pub fn medicine_table() -> Value {
	json!([
		{
			"disease": "Flu",
			"conventional_medicine": "Oseltamivir",
			"conventional_rating": 4.2,
			"alternative_medicine": "Elderberry syrup",
			"alternative_rating": 3.6
		},
		{
			"disease": "Flu",
			"conventional_medicine": "Paracetamol",
			"conventional_rating": 4.0,
			"alternative_medicine": "Echinacea",
			"alternative_rating": 3.1
		},
		{
			"disease": "Migraine",
			"conventional_medicine": "Sumatriptan",
			"conventional_rating": 4.4,
			"alternative_medicine": "Feverfew",
			"alternative_rating": 3.3
		}
	])
}
