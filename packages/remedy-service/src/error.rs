use remedy_model::{EncodingError, PredictionError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Encoding error: {0}")]
	Encoding(#[from] EncodingError),
	#[error("Prediction error: {0}")]
	Prediction(#[from] PredictionError),
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<remedy_providers::Error> for Error {
	fn from(err: remedy_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
