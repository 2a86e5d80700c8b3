use serde::Serialize;

use remedy_domain::{FeatureValue, FeatureVector};

use crate::{
	classifier::{Classifier, first_max},
	error::PredictionError,
};

pub const TOP_K: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionResult {
	pub predicted_disease: String,
	pub confidence: f64,
	/// `(label, probability)` pairs, highest first, at most [`TOP_K`] long.
	pub top_classes: Vec<(String, f64)>,
}

/// Runs the classifier over an encoded vector and ranks its classes.
///
/// The vector is reindexed into the classifier's feature order here, so callers never need to
/// care about column layout.
pub fn predict(
	vector: &FeatureVector,
	classifier: &dyn Classifier,
) -> Result<PredictionResult, PredictionError> {
	let row = align(vector, classifier.feature_names())?;
	let probabilities = classifier.predict_proba(&row)?;
	let classes = classifier.classes();

	if probabilities.len() != classes.len() {
		return Err(PredictionError::new(format!(
			"Classifier returned {} probabilities for {} classes.",
			probabilities.len(),
			classes.len()
		)));
	}
	if probabilities.iter().any(|probability| probability.is_nan()) {
		return Err(PredictionError::new("Classifier returned a NaN probability."));
	}

	let best = first_max(&probabilities)
		.ok_or_else(|| PredictionError::new("Classifier produced no class probabilities."))?;
	let predicted_disease = classes[best].clone();
	let confidence = probabilities[best];
	let mut ranked = classes.iter().cloned().zip(probabilities).collect::<Vec<_>>();

	// Stable, so equal probabilities keep the classifier's class order.
	ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
	ranked.truncate(TOP_K);

	Ok(PredictionResult { predicted_disease, confidence, top_classes: ranked })
}

fn align(vector: &FeatureVector, feature_names: &[String]) -> Result<Vec<f64>, PredictionError> {
	let mut row = Vec::with_capacity(feature_names.len());

	for name in feature_names {
		let value = vector
			.get(name)
			.ok_or_else(|| PredictionError::new(format!("Feature vector is missing {name:?}.")))?;
		let numeric = match value {
			FeatureValue::OneHot(flag) => f64::from(*flag),
			FeatureValue::Encoded(code) => *code,
			FeatureValue::Raw(text) =>
				return Err(PredictionError::new(format!(
					"Feature {name:?} still holds unencoded text {text:?}."
				))),
		};

		row.push(numeric);
	}

	if vector.len() != feature_names.len() {
		let extra = vector
			.iter()
			.map(|(name, _)| name.as_str())
			.filter(|name| !feature_names.iter().any(|expected| expected == name))
			.collect::<Vec<_>>();

		return Err(PredictionError::new(format!(
			"Feature vector has {} features, classifier expects {}; unexpected: {}.",
			vector.len(),
			feature_names.len(),
			extra.join(", ")
		)));
	}

	Ok(row)
}
