//! Payout calculations for the farmland pension estimator.
//!
//! The estimator turns a validated [`crate::EstimationInput`] into the four
//! candidate monthly payouts using an [`crate::AgeFactorTable`].

pub mod common;
pub mod payout;

pub use payout::{EstimatorConfig, PayoutEstimator, PayoutEstimatorError};
