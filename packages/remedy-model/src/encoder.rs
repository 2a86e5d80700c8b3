use std::collections::BTreeMap;

use serde::Deserialize;

use remedy_domain::{CategoricalField, FeatureValue, FeatureVector};

use crate::error::EncodingError;

/// Fitted ordinal encoder: per categorical field, normalized value to trained code.
#[derive(Clone, Debug, Deserialize)]
pub struct CategoricalEncoder {
	fields: BTreeMap<String, BTreeMap<String, f64>>,
}
impl CategoricalEncoder {
	pub fn new(fields: BTreeMap<String, BTreeMap<String, f64>>) -> Self {
		Self { fields }
	}

	pub fn covers(&self, field: CategoricalField) -> bool {
		self.fields.contains_key(field.as_str())
	}

	pub fn code(&self, field: CategoricalField, value: &str) -> Option<f64> {
		self.fields.get(field.as_str()).and_then(|codes| codes.get(value)).copied()
	}

	/// Swaps the raw text of every categorical field for its ordinal code.
	///
	/// One-hot entries are returned untouched. Unseen values fail instead of defaulting.
	pub fn encode(&self, mut vector: FeatureVector) -> Result<FeatureVector, EncodingError> {
		for field in CategoricalField::ALL {
			let slot = vector.get_mut(field.as_str()).ok_or(EncodingError::MissingField { field })?;
			let FeatureValue::Raw(value) = &*slot else {
				return Err(EncodingError::NotRaw { field });
			};
			let code = self
				.code(field, value.as_str())
				.ok_or_else(|| EncodingError::UnseenValue { field, value: value.clone() })?;

			*slot = FeatureValue::Encoded(code);
		}

		Ok(vector)
	}
}
