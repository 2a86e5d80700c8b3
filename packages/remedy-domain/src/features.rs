use std::collections::{BTreeMap, btree_map};

use serde::Serialize;

use crate::{matcher::FeatureMatch, normalize::normalize, schema::FeatureSchema};

/// Categorical inputs that bypass one-hot encoding and are ordinally encoded instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalField {
	AgeGroup,
	Severity,
}
impl CategoricalField {
	pub const ALL: [Self; 2] = [Self::AgeGroup, Self::Severity];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::AgeGroup => "ageGroup",
			Self::Severity => "severity",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|field| field.as_str() == name)
	}
}
impl std::fmt::Display for CategoricalField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
	OneHot(u8),
	/// Normalized categorical text awaiting ordinal encoding.
	Raw(String),
	Encoded(f64),
}
impl FeatureValue {
	/// Numeric view used by the classifier. Raw text has none.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::OneHot(flag) => Some(f64::from(*flag)),
			Self::Raw(_) => None,
			Self::Encoded(code) => Some(*code),
		}
	}
}

/// Feature name to value, keyed exactly by the schema plus the categorical fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
	values: BTreeMap<String, FeatureValue>,
}
impl FeatureVector {
	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&FeatureValue> {
		self.values.get(name)
	}

	/// Mutable access to an existing entry. The key set cannot grow through this.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut FeatureValue> {
		self.values.get_mut(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, FeatureValue> {
		self.values.iter()
	}

	/// One-hot features currently set to 1.
	pub fn active(&self) -> impl Iterator<Item = &str> {
		self.values.iter().filter_map(|(name, value)| match value {
			FeatureValue::OneHot(1) => Some(name.as_str()),
			_ => None,
		})
	}

	fn insert(&mut self, name: impl Into<String>, value: FeatureValue) {
		self.values.insert(name.into(), value);
	}
}
impl FromIterator<(String, FeatureValue)> for FeatureVector {
	fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
		Self { values: iter.into_iter().collect() }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	Symptom,
	HealthFactor,
}
impl TokenKind {
	pub fn prefix(self) -> &'static str {
		match self {
			Self::Symptom => "symptom_",
			Self::HealthFactor => "healthfactor_",
		}
	}
}

/// A user token that matched nothing in the schema. Reported, never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnrecognizedToken {
	pub kind: TokenKind,
	pub token: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UserInput<'a> {
	/// Comma-separated, e.g. `"fever, cough"`.
	pub symptoms: &'a str,
	/// Comma-separated and optional, e.g. `"diabetes, smoker"`.
	pub health_factors: &'a str,
	pub age_group: &'a str,
	pub severity: &'a str,
}

#[derive(Clone, Debug)]
pub struct BuiltFeatures {
	pub vector: FeatureVector,
	pub unrecognized: Vec<UnrecognizedToken>,
}

/// Aligns user input with the schema.
///
/// One-hot entries start at 0 and flip to 1 for every matched token. The categorical fields
/// carry normalized raw text for the encoder. Unknown tokens are logged and collected but never
/// abort the build.
pub fn build(input: &UserInput<'_>, schema: &FeatureSchema) -> BuiltFeatures {
	let mut vector = FeatureVector::default();
	let mut unrecognized = Vec::new();

	for name in schema.one_hot_names() {
		vector.insert(name, FeatureValue::OneHot(0));
	}

	mark_tokens(input.symptoms, TokenKind::Symptom, schema, &mut vector, &mut unrecognized);

	if !input.health_factors.trim().is_empty() {
		mark_tokens(
			input.health_factors,
			TokenKind::HealthFactor,
			schema,
			&mut vector,
			&mut unrecognized,
		);
	}

	vector.insert(CategoricalField::AgeGroup.as_str(), FeatureValue::Raw(normalize(input.age_group)));
	vector.insert(CategoricalField::Severity.as_str(), FeatureValue::Raw(normalize(input.severity)));

	BuiltFeatures { vector, unrecognized }
}

fn mark_tokens(
	text: &str,
	kind: TokenKind,
	schema: &FeatureSchema,
	vector: &mut FeatureVector,
	unrecognized: &mut Vec<UnrecognizedToken>,
) {
	for raw in text.split(',') {
		let token = normalize(raw);

		// An empty candidate would substring-match the first prefixed column.
		if token.is_empty() {
			continue;
		}

		let candidate = format!("{}{token}", kind.prefix());
		let matched = crate::matcher::match_feature(&candidate, schema)
			.filter(|found| CategoricalField::from_name(found.name()).is_none());

		match matched {
			Some(found) => {
				if let FeatureMatch::Approximate(name) = found {
					tracing::debug!(%candidate, feature = name, "Approximate feature match.");
				}

				vector.insert(found.name(), FeatureValue::OneHot(1));
			},
			None => {
				tracing::warn!(kind = ?kind, %token, "Unrecognized input token.");

				unrecognized.push(UnrecognizedToken { kind, token });
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> FeatureSchema {
		FeatureSchema::new(
			[
				"symptom_fever",
				"symptom_cough",
				"symptom_chest_pain_severe",
				"healthfactor_diabetes",
				"healthfactor_smoker",
				"ageGroup",
				"severity",
			]
			.iter()
			.map(|name| name.to_string())
			.collect(),
		)
	}

	#[test]
	fn trailing_comma_does_not_mark_first_symptom() {
		let input = UserInput { symptoms: "cough, ", age_group: "adult", ..Default::default() };
		let built = build(&input, &schema());

		assert_eq!(built.vector.active().collect::<Vec<_>>(), ["symptom_cough"]);
		assert!(built.unrecognized.is_empty());
	}

	#[test]
	fn approximate_match_marks_first_containing_column() {
		let input = UserInput { symptoms: "Chest Pain", ..Default::default() };
		let built = build(&input, &schema());

		assert_eq!(built.vector.get("symptom_chest_pain_severe"), Some(&FeatureValue::OneHot(1)));
	}

	#[test]
	fn blank_health_factors_contribute_nothing() {
		let input = UserInput { symptoms: "fever", health_factors: "  ", ..Default::default() };
		let built = build(&input, &schema());

		assert_eq!(built.vector.get("healthfactor_diabetes"), Some(&FeatureValue::OneHot(0)));
		assert_eq!(built.vector.get("healthfactor_smoker"), Some(&FeatureValue::OneHot(0)));
	}

	#[test]
	fn categorical_fields_hold_normalized_text() {
		let input = UserInput { age_group: " Young Adult ", severity: "SEVERE!", ..Default::default() };
		let built = build(&input, &schema());

		assert_eq!(built.vector.get("ageGroup"), Some(&FeatureValue::Raw("young_adult".to_string())));
		assert_eq!(built.vector.get("severity"), Some(&FeatureValue::Raw("severe".to_string())));
	}
}
