use serde::{Deserialize, Serialize};

use remedy_model::{Preference, Recommendation};

use crate::{Error, RemedyService, Result};

pub const NOT_FOUND_MESSAGE: &str = "No medicine recommendations found for this disease.";

#[derive(Clone, Debug, Deserialize)]
pub struct RecommendationRequest {
	#[serde(default)]
	pub disease: String,
	#[serde(default)]
	pub preference: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationResponse {
	Found { disease: String, preference: Preference, recommendations: Vec<Recommendation> },
	NotFound { disease: String, message: String },
}

impl RemedyService {
	pub fn recommendations(&self, req: &RecommendationRequest) -> Result<RecommendationResponse> {
		let disease = req.disease.trim();

		if disease.is_empty() {
			return Err(Error::InvalidRequest { message: "disease must be non-empty.".to_string() });
		}

		let preference = Preference::parse(&req.preference);
		let response = match self.artifacts.medicines().lookup(disease, preference) {
			Some(recommendations) => RecommendationResponse::Found {
				disease: disease.to_string(),
				preference,
				recommendations,
			},
			None => {
				tracing::info!(%disease, "No medicine recommendations for disease.");

				RecommendationResponse::NotFound {
					disease: disease.to_string(),
					message: NOT_FOUND_MESSAGE.to_string(),
				}
			},
		};

		Ok(response)
	}
}
