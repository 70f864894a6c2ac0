//! Stochastic price projection.
//!
//! Unlike the deterministic calculators, this engine works in `f64`:
//! bootstrap sampling and correlation math gain nothing from fixed-point
//! precision, and the envelope's `precision` field says so.

pub mod projector;
pub mod returns;

pub use projector::{
    simulate, FactorWeight, SimulationInput, SimulationOutput, SimulationSummary, DEFAULT_RUNS,
};
pub use returns::{align, AlignedFactor, AlignedReturns, FactorInfluence, MacroFactor, RawSeries};

use serde::Serialize;

use crate::types::{ComputationMetadata, ComputationOutput};

/// f64 counterpart of [`crate::types::with_metadata`].
pub(crate) fn with_metadata_f64<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}
