use serde::Deserialize;

use crate::error::{Error, PredictionError, Result};

/// A trained model over a fixed, ordered feature layout.
pub trait Classifier
where
	Self: Send + Sync,
{
	/// Column order the model expects rows in.
	fn feature_names(&self) -> &[String];

	/// Class labels, in the order probabilities are reported.
	fn classes(&self) -> &[String];

	fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError>;

	/// Most probable label. Ties resolve to the earliest class.
	fn predict(&self, row: &[f64]) -> Result<String, PredictionError> {
		let probabilities = self.predict_proba(row)?;

		first_max(&probabilities)
			.and_then(|idx| self.classes().get(idx).cloned())
			.ok_or_else(|| PredictionError::new("Classifier produced no class probabilities."))
	}
}

/// Index of the largest probability; the earliest one wins a tie.
pub fn first_max(probabilities: &[f64]) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;

	for (idx, probability) in probabilities.iter().copied().enumerate() {
		if best.is_none_or(|(_, current)| probability > current) {
			best = Some((idx, probability));
		}
	}

	best.map(|(idx, _)| idx)
}

/// Multinomial linear model scored with softmax.
///
/// `coefficients` holds one row per class, each as long as `feature_names`.
#[derive(Clone, Debug, Deserialize)]
pub struct SoftmaxClassifier {
	feature_names: Vec<String>,
	classes: Vec<String>,
	coefficients: Vec<Vec<f64>>,
	intercepts: Vec<f64>,
}
impl SoftmaxClassifier {
	pub fn new(
		feature_names: Vec<String>,
		classes: Vec<String>,
		coefficients: Vec<Vec<f64>>,
		intercepts: Vec<f64>,
	) -> Result<Self> {
		let classifier = Self { feature_names, classes, coefficients, intercepts };

		classifier.check_shape()?;

		Ok(classifier)
	}

	/// Verifies the weight matrix matches the declared classes and features.
	pub fn check_shape(&self) -> Result<()> {
		if self.classes.is_empty() {
			return Err(invalid("Classifier must declare at least one class.".to_string()));
		}
		if self.coefficients.len() != self.classes.len() {
			return Err(invalid(format!(
				"Classifier has {} coefficient rows for {} classes.",
				self.coefficients.len(),
				self.classes.len()
			)));
		}
		if self.intercepts.len() != self.classes.len() {
			return Err(invalid(format!(
				"Classifier has {} intercepts for {} classes.",
				self.intercepts.len(),
				self.classes.len()
			)));
		}
		if let Some((idx, row)) =
			self.coefficients.iter().enumerate().find(|(_, row)| row.len() != self.feature_names.len())
		{
			return Err(invalid(format!(
				"Classifier coefficient row {idx} has {} weights for {} features.",
				row.len(),
				self.feature_names.len()
			)));
		}

		Ok(())
	}
}
impl Classifier for SoftmaxClassifier {
	fn feature_names(&self) -> &[String] {
		&self.feature_names
	}

	fn classes(&self) -> &[String] {
		&self.classes
	}

	fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
		if row.len() != self.feature_names.len() {
			return Err(PredictionError::new(format!(
				"Expected {} features, got {}.",
				self.feature_names.len(),
				row.len()
			)));
		}

		let logits = self
			.coefficients
			.iter()
			.zip(&self.intercepts)
			.map(|(weights, intercept)| {
				weights.iter().zip(row).map(|(weight, value)| weight * value).sum::<f64>() + intercept
			})
			.collect::<Vec<_>>();

		softmax(&logits)
	}
}

fn invalid(message: String) -> Error {
	Error::InvalidArtifact { message }
}

fn softmax(logits: &[f64]) -> Result<Vec<f64>, PredictionError> {
	if logits.iter().any(|logit| !logit.is_finite()) {
		return Err(PredictionError::new("Classifier produced a non-finite score."));
	}

	let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	let exps = logits.iter().map(|logit| (logit - max).exp()).collect::<Vec<_>>();
	let total: f64 = exps.iter().sum();

	Ok(exps.into_iter().map(|value| value / total).collect())
}
