use serde::{Deserialize, Serialize};

use remedy_domain::{UnrecognizedToken, UserInput};
use remedy_model::PredictionResult;

use crate::{RemedyService, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
	pub symptoms: String,
	#[serde(default)]
	pub health_factors: String,
	pub age_group: String,
	pub severity: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PredictResponse {
	#[serde(flatten)]
	pub result: PredictionResult,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub unrecognized_tokens: Vec<UnrecognizedToken>,
}

impl RemedyService {
	/// Runs one request through build, encode and classify.
	///
	/// Unknown symptoms or health factors never fail the request; they come back in
	/// `unrecognized_tokens`.
	pub fn predict(&self, req: &PredictRequest) -> Result<PredictResponse> {
		let input = UserInput {
			symptoms: &req.symptoms,
			health_factors: &req.health_factors,
			age_group: &req.age_group,
			severity: &req.severity,
		};
		let built = remedy_domain::build(&input, self.artifacts.schema());
		let encoded = self.artifacts.encoder().encode(built.vector)?;
		let result = remedy_model::predict(&encoded, self.artifacts.classifier())?;

		tracing::info!(
			disease = %result.predicted_disease,
			confidence = result.confidence,
			unrecognized = built.unrecognized.len(),
			"Prediction completed."
		);

		Ok(PredictResponse { result, unrecognized_tokens: built.unrecognized })
	}
}
