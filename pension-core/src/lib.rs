pub mod calculations;
pub mod intake;
pub mod models;

pub use calculations::{EstimatorConfig, PayoutEstimator, PayoutEstimatorError};
pub use models::*;
