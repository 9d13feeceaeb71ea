//! Request pipeline: validate, normalize, predict, format.

pub mod normalize;
pub mod pipeline;
pub mod validation;
pub mod verdict;

pub use normalize::normalize;
pub use pipeline::{load_pipeline, PredictionService, Predictor};
pub use validation::validate_record;
pub use verdict::PredictionResponse;
