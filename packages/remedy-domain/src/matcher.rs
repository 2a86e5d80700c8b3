use crate::schema::FeatureSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureMatch<'a> {
	Exact(&'a str),
	/// First schema entry, in schema order, containing the candidate.
	Approximate(&'a str),
}
impl<'a> FeatureMatch<'a> {
	pub fn name(self) -> &'a str {
		match self {
			Self::Exact(name) | Self::Approximate(name) => name,
		}
	}
}

/// Resolves a candidate feature name against the schema.
///
/// Exact membership wins. Otherwise the schema is scanned in order and the first entry that
/// contains `candidate` as a substring is returned, so ties go to the earlier column.
pub fn match_feature<'a>(candidate: &str, schema: &'a FeatureSchema) -> Option<FeatureMatch<'a>> {
	if let Some(name) = schema.get(candidate) {
		return Some(FeatureMatch::Exact(name));
	}

	schema
		.names()
		.iter()
		.find(|name| name.contains(candidate))
		.map(|name| FeatureMatch::Approximate(name.as_str()))
}
