//! Quantitative finance and actuarial calculation engine.
//!
//! Deterministic monetary math is carried out in `rust_decimal` (128-bit
//! fixed point); the stochastic simulation engine works in `f64`. Every
//! public operation returns a [`ComputationOutput`] envelope recording the
//! methodology, the assumptions that went into the numbers, and any
//! warnings raised along the way.

pub mod amortization;
pub mod annuity;
pub mod error;
pub mod fixed_income;
pub mod reserving;
pub mod simulation;
pub mod types;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all engine operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
