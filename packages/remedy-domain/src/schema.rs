use std::collections::HashSet;

use serde::Deserialize;

use crate::features::CategoricalField;

/// Ordered, immutable list of feature names a classifier was trained on.
///
/// Duplicate names keep their first position.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct FeatureSchema {
	names: Vec<String>,
	index: HashSet<String>,
}
impl FeatureSchema {
	pub fn new(names: Vec<String>) -> Self {
		let mut index = HashSet::with_capacity(names.len());
		let names = names.into_iter().filter(|name| index.insert(name.clone())).collect();

		Self { names, index }
	}

	pub fn names(&self) -> &[String] {
		&self.names
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.index.contains(name)
	}

	/// Returns the schema's own copy of `name`, if present.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.index.get(name).map(String::as_str)
	}

	/// Schema entries that take 0/1 values, in schema order.
	pub fn one_hot_names(&self) -> impl Iterator<Item = &str> {
		self.names
			.iter()
			.map(String::as_str)
			.filter(|name| CategoricalField::from_name(name).is_none())
	}
}
impl From<Vec<String>> for FeatureSchema {
	fn from(names: Vec<String>) -> Self {
		Self::new(names)
	}
}
