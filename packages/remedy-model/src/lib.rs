//! Model-side artifacts and the two inference stages that use them: ordinal encoding of the
//! categorical fields and classification.

pub mod artifacts;
pub mod classifier;
pub mod encoder;
pub mod medicine;
pub mod predictor;

mod error;

pub use artifacts::Artifacts;
pub use classifier::{Classifier, SoftmaxClassifier};
pub use encoder::CategoricalEncoder;
pub use error::{EncodingError, Error, PredictionError, Result};
pub use medicine::{MedicineRow, MedicineTable, Preference, Recommendation};
pub use predictor::{PredictionResult, TOP_K, predict};
