//! Bornhuetter-Ferguson reserve projection.
//!
//! Blends the triangle's development pattern with an a-priori expectation:
//! earned premiums scaled by a constant loss ratio anchored to the oldest
//! accident row. Premiums come from the caller; when absent they are
//! simulated from uniform draws scaled by the largest row total, under the
//! caller's seed so even the fallback is reproducible.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use statrs::distribution::Uniform;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::triangle::{development_factors, ClaimsTriangle};

/// Simulated premiums span up to this multiple of the largest row total.
const PREMIUM_SPREAD: f64 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BornhuetterFergusonInput {
    pub triangle: ClaimsTriangle,
    /// Earned premium per accident row. `None` falls back to simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premiums: Option<Vec<Decimal>>,
    /// Seed for the premium simulation; ignored when premiums are supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BornhuetterFergusonOutput {
    pub development_factors: Vec<Decimal>,
    /// CDF[0] = 1, CDF[k] = CDF[k−1] · LDF[k−1]
    pub cumulative_factors: Vec<Decimal>,
    /// 1 − 1/CDF[k]: the share of each period still unreported
    pub percent_unreported: Vec<Rate>,
    pub premiums: Vec<Money>,
    pub loss_ratio: Rate,
    pub initial_ultimate_losses: Vec<Money>,
    pub emerging_liabilities: Vec<Money>,
    pub reserve_requirement: Money,
}

/// Project the reserve requirement with the Bornhuetter-Ferguson method.
pub fn bornhuetter_ferguson(
    input: &BornhuetterFergusonInput,
) -> FinCalcResult<ComputationOutput<BornhuetterFergusonOutput>> {
    let start = Instant::now();
    let triangle = &input.triangle;
    let mut warnings = Vec::new();

    let factors = development_factors(triangle)?;

    let mut cumulative = Vec::with_capacity(factors.len());
    cumulative.push(Decimal::ONE);
    for k in 1..factors.len() {
        let next = cumulative[k - 1] * factors[k - 1];
        cumulative.push(next);
    }

    let mut percent_unreported = Vec::with_capacity(cumulative.len());
    for (k, cdf) in cumulative.iter().enumerate() {
        if cdf.is_zero() {
            return Err(FinCalcError::DivisionByZero {
                context: format!("cumulative development factor {}", k),
            });
        }
        percent_unreported.push(Decimal::ONE - Decimal::ONE / cdf);
    }

    let premiums = resolve_premiums(input, &mut warnings)?;

    // Constant loss ratio anchored to the oldest accident row, which is
    // the most developed one.
    let anchor = triangle
        .latest_observed(0)
        .ok_or_else(|| FinCalcError::InsufficientData(
            "oldest accident row has no observation".to_string(),
        ))?;
    if premiums[0] <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "premiums".to_string(),
            reason: "anchor-row premium must be positive".to_string(),
        });
    }
    let loss_ratio = anchor / premiums[0];

    let mut initial_ultimate: Vec<Decimal> =
        premiums.iter().map(|p| loss_ratio * p).collect();
    // The anchor row is fully credible: its ultimate is what was observed
    initial_ultimate[0] = anchor;

    let paired = initial_ultimate.len().min(percent_unreported.len());
    if paired < initial_ultimate.len() {
        warnings.push(format!(
            "Emerging liabilities truncated to {} of {} accident rows (development pattern is shorter)",
            paired,
            initial_ultimate.len()
        ));
    }
    let emerging: Vec<Decimal> = initial_ultimate
        .iter()
        .zip(&percent_unreported)
        .take(paired)
        .map(|(ultimate, pct)| ultimate * pct)
        .collect();
    let reserve_requirement: Decimal = emerging.iter().sum();

    let result = BornhuetterFergusonOutput {
        development_factors: factors,
        cumulative_factors: cumulative,
        percent_unreported,
        premiums,
        loss_ratio,
        initial_ultimate_losses: initial_ultimate,
        emerging_liabilities: emerging,
        reserve_requirement,
    };

    let assumptions = json!({
        "loss_ratio_basis": "oldest_accident_row",
        "premium_source": if input.premiums.is_some() { "supplied" } else { "simulated" },
        "premium_spread": PREMIUM_SPREAD,
        "excludes_ibnr": true,
    });

    Ok(with_metadata(
        "Bornhuetter-Ferguson reserve projection",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn resolve_premiums(
    input: &BornhuetterFergusonInput,
    warnings: &mut Vec<String>,
) -> FinCalcResult<Vec<Decimal>> {
    let n_rows = input.triangle.n_rows();
    match &input.premiums {
        Some(premiums) => {
            if premiums.len() != n_rows {
                return Err(FinCalcError::InvalidInput {
                    field: "premiums".to_string(),
                    reason: format!(
                        "expected {} entries to match the accident rows, got {}",
                        n_rows,
                        premiums.len()
                    ),
                });
            }
            if premiums.iter().any(|p| *p <= Decimal::ZERO) {
                return Err(FinCalcError::InvalidInput {
                    field: "premiums".to_string(),
                    reason: "every premium must be positive".to_string(),
                });
            }
            Ok(premiums.clone())
        }
        None => {
            warnings.push(
                "No premiums supplied; simulating earned premiums from the triangle".to_string(),
            );
            simulate_premiums(&input.triangle, input.seed)
        }
    }
}

/// Uniform draws scaled by the largest observed row total.
fn simulate_premiums(
    triangle: &ClaimsTriangle,
    seed: Option<u64>,
) -> FinCalcResult<Vec<Decimal>> {
    let max_total = (0..triangle.n_rows())
        .map(|i| triangle.row_total(i))
        .max()
        .unwrap_or_default();
    let scale = max_total.to_f64().ok_or_else(|| FinCalcError::NumericOverflow {
        context: "premium simulation scale".to_string(),
    })? * PREMIUM_SPREAD;

    let uniform = Uniform::new(0.0, 1.0).map_err(|e| FinCalcError::InvalidInput {
        field: "premium_spread".to_string(),
        reason: e.to_string(),
    })?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    (0..triangle.n_rows())
        .map(|_| {
            let draw = uniform.sample(&mut rng);
            Decimal::from_f64(draw * scale).ok_or_else(|| FinCalcError::NumericOverflow {
                context: "simulated premium".to_string(),
            })
        })
        .collect()
}
