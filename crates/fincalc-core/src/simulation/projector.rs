//! Correlation-weighted bootstrap Monte Carlo projection.
//!
//! Historical stock returns are tilted by macro-factor returns weighted by
//! their Pearson correlation with the stock, then each path resamples the
//! adjusted returns with replacement and compounds them from the initial
//! price. Paths run in parallel; per-path RNG streams are derived from the
//! base seed, so a seeded run produces identical output regardless of how
//! rayon schedules the work.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::ComputationOutput;
use crate::FinCalcResult;

use super::returns::{align, AlignedReturns, FactorInfluence, MacroFactor, RawSeries};
use super::with_metadata_f64;

pub const DEFAULT_RUNS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub stock: RawSeries,
    #[serde(default)]
    pub factors: Vec<MacroFactor>,
    pub initial_price: f64,
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// Base seed; `None` draws one from entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_runs() -> u32 {
    DEFAULT_RUNS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorWeight {
    pub name: String,
    pub influence: FactorInfluence,
    /// Pearson correlation against the stock returns (non-finite for a
    /// zero-variance series)
    pub correlation: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub runs: u32,
    pub horizon: usize,
    pub factor_weights: Vec<FactorWeight>,
    pub terminal_prices: Vec<f64>,
}

impl SimulationOutput {
    pub fn mean(&self) -> f64 {
        if self.terminal_prices.is_empty() {
            return 0.0;
        }
        self.terminal_prices.iter().sum::<f64>() / self.terminal_prices.len() as f64
    }

    /// Sample standard deviation of the terminal prices.
    pub fn std_dev(&self) -> f64 {
        let n = self.terminal_prices.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self
            .terminal_prices
            .iter()
            .map(|p| (p - mean).powi(2))
            .sum();
        (ss / (n - 1) as f64).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.terminal_prices.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.terminal_prices
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            mean: self.mean(),
            std_dev: self.std_dev(),
            min: self.min(),
            max: self.max(),
        }
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Run the full projection: align, weight, bootstrap.
pub fn simulate(input: &SimulationInput) -> FinCalcResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let aligned = align(&input.stock, &input.factors)?;
    let mut warnings = Vec::new();
    let factor_weights = compute_factor_weights(&aligned, &mut warnings);
    let adjusted = adjusted_returns(&aligned, &factor_weights);

    let base_seed = input.seed.unwrap_or_else(rand::random);
    let horizon = aligned.horizon;
    let initial_price = input.initial_price;

    let terminal_prices: Vec<f64> = (0..u64::from(input.runs))
        .into_par_iter()
        .map(|path| {
            let mut rng = path_rng(base_seed, path);
            let mut price = initial_price;
            for _ in 0..horizon {
                price *= 1.0 + adjusted[rng.gen_range(0..horizon)];
            }
            price
        })
        .collect();

    let result = SimulationOutput {
        runs: input.runs,
        horizon,
        factor_weights,
        terminal_prices,
    };

    let assumptions = json!({
        "sampling": "bootstrap_with_replacement",
        "runs": input.runs,
        "horizon": horizon,
        "seeded": input.seed.is_some(),
    });

    Ok(with_metadata_f64(
        "Correlation-weighted bootstrap Monte Carlo",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

/// Weight per factor: Pearson correlation, sign-forced for inverse factors,
/// zeroed when degenerate.
fn compute_factor_weights(aligned: &AlignedReturns, warnings: &mut Vec<String>) -> Vec<FactorWeight> {
    aligned
        .factors
        .iter()
        .map(|factor| {
            let correlation = pearson(&aligned.stock, &factor.returns);
            let raw = match factor.influence {
                FactorInfluence::Direct => correlation,
                FactorInfluence::Inverse => -correlation.abs(),
            };
            let weight = if raw.is_finite() {
                raw
            } else {
                warnings.push(format!(
                    "Factor '{}' has a degenerate correlation; its weight is zero",
                    factor.name
                ));
                0.0
            };
            FactorWeight {
                name: factor.name.clone(),
                influence: factor.influence,
                correlation,
                weight,
            }
        })
        .collect()
}

fn adjusted_returns(aligned: &AlignedReturns, weights: &[FactorWeight]) -> Vec<f64> {
    (0..aligned.horizon)
        .map(|t| {
            let tilt: f64 = aligned
                .factors
                .iter()
                .zip(weights)
                .map(|(factor, w)| w.weight * factor.returns[t])
                .sum();
            aligned.stock[t] + tilt
        })
        .collect()
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if x.is_empty() {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Independent stream per path, stable under any scheduling order.
fn path_rng(base_seed: u64, path: u64) -> StdRng {
    StdRng::seed_from_u64(base_seed ^ (path.wrapping_add(1)).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn validate_input(input: &SimulationInput) -> FinCalcResult<()> {
    if !input.initial_price.is_finite() || input.initial_price <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "initial_price".to_string(),
            reason: "must be a positive finite number".to_string(),
        });
    }
    if input.runs == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "runs".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
