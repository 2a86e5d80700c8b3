//! Input alignment for the disease classifier: token normalization, schema matching and
//! feature-vector assembly. Everything here is pure and allocation-local to one request.

pub mod features;
pub mod matcher;
pub mod normalize;
pub mod schema;

pub use features::{
	BuiltFeatures, CategoricalField, FeatureValue, FeatureVector, TokenKind, UnrecognizedToken,
	UserInput, build,
};
pub use matcher::{FeatureMatch, match_feature};
pub use normalize::normalize;
pub use schema::FeatureSchema;
