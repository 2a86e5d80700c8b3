use std::path::PathBuf;

use remedy_domain::CategoricalField;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read artifact at {path:?}.")]
	ReadArtifact { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse artifact at {path:?}.")]
	ParseArtifact { path: PathBuf, source: serde_json::Error },
	#[error("{message}")]
	InvalidArtifact { message: String },
}

/// A categorical value could not be mapped to its trained ordinal code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
	#[error("Value {value:?} for {field} was not seen during training.")]
	UnseenValue { field: CategoricalField, value: String },
	#[error("Feature vector is missing the {field} field.")]
	MissingField { field: CategoricalField },
	#[error("Feature vector holds a non-text value for {field}.")]
	NotRaw { field: CategoricalField },
}
impl EncodingError {
	pub fn field(&self) -> CategoricalField {
		match self {
			Self::UnseenValue { field, .. } | Self::MissingField { field } | Self::NotRaw { field } =>
				*field,
		}
	}
}

/// Any failure while running the classifier, with the underlying cause as text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PredictionError {
	message: String,
}
impl PredictionError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}
