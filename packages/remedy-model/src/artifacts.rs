use std::{collections::HashSet, fs, path::Path};

use serde::de::DeserializeOwned;

use remedy_domain::{CategoricalField, FeatureSchema};

use crate::{
	classifier::{Classifier, SoftmaxClassifier},
	encoder::CategoricalEncoder,
	error::{Error, Result},
	medicine::MedicineTable,
};

/// Everything a prediction needs, loaded once and only ever read afterwards.
pub struct Artifacts {
	schema: FeatureSchema,
	encoder: CategoricalEncoder,
	classifier: Box<dyn Classifier>,
	medicines: MedicineTable,
}
impl Artifacts {
	/// Builds the artifact set after checking the pieces agree with each other.
	pub fn new(
		schema: FeatureSchema,
		encoder: CategoricalEncoder,
		classifier: Box<dyn Classifier>,
		medicines: MedicineTable,
	) -> Result<Self> {
		check_coherence(&schema, &encoder, classifier.as_ref())?;

		Ok(Self { schema, encoder, classifier, medicines })
	}

	pub fn load(cfg: &remedy_config::Artifacts) -> Result<Self> {
		let schema: FeatureSchema = read_json(&cfg.feature_schema)?;
		let encoder: CategoricalEncoder = read_json(&cfg.encoder)?;
		let classifier: SoftmaxClassifier = read_json(&cfg.classifier)?;
		let medicines: MedicineTable = read_json(&cfg.medicine_table)?;

		classifier.check_shape()?;

		let artifacts = Self::new(schema, encoder, Box::new(classifier), medicines)?;

		tracing::info!(
			features = artifacts.schema.len(),
			classes = artifacts.classifier.classes().len(),
			diseases = artifacts.medicines.disease_count(),
			"Artifacts loaded."
		);

		Ok(artifacts)
	}

	pub fn schema(&self) -> &FeatureSchema {
		&self.schema
	}

	pub fn encoder(&self) -> &CategoricalEncoder {
		&self.encoder
	}

	pub fn classifier(&self) -> &dyn Classifier {
		self.classifier.as_ref()
	}

	pub fn medicines(&self) -> &MedicineTable {
		&self.medicines
	}
}

fn read_json<T>(path: &Path) -> Result<T>
where
	T: DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadArtifact { path: path.to_path_buf(), source: err })?;

	serde_json::from_str(&raw)
		.map_err(|err| Error::ParseArtifact { path: path.to_path_buf(), source: err })
}

fn check_coherence(
	schema: &FeatureSchema,
	encoder: &CategoricalEncoder,
	classifier: &dyn Classifier,
) -> Result<()> {
	if classifier.classes().is_empty() {
		return Err(Error::InvalidArtifact {
			message: "Classifier must declare at least one class.".to_string(),
		});
	}

	for field in CategoricalField::ALL {
		if !encoder.covers(field) {
			return Err(Error::InvalidArtifact {
				message: format!("Encoder has no mapping for {field}."),
			});
		}
	}

	let mut model_features = HashSet::new();

	for name in classifier.feature_names() {
		if !model_features.insert(name.as_str()) {
			return Err(Error::InvalidArtifact {
				message: format!("Classifier lists feature {name:?} more than once."),
			});
		}
	}

	let mut expected = schema.names().iter().map(String::as_str).collect::<HashSet<_>>();

	expected.extend(CategoricalField::ALL.map(CategoricalField::as_str));

	if let Some(missing) = expected.iter().find(|name| !model_features.contains(*name)) {
		return Err(Error::InvalidArtifact {
			message: format!("Classifier does not accept feature {missing:?}."),
		});
	}
	if let Some(unknown) = model_features.iter().find(|name| !expected.contains(*name)) {
		return Err(Error::InvalidArtifact {
			message: format!("Classifier expects feature {unknown:?} missing from the schema."),
		});
	}

	Ok(())
}
