//! Chain Ladder reserve projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinCalcResult;

use super::triangle::{development_factors, ClaimsTriangle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLadderOutput {
    pub development_factors: Vec<Decimal>,
    /// The input triangle with every unobserved cell projected forward.
    /// A derived artifact; the input triangle is left untouched.
    pub completed: Vec<Vec<Decimal>>,
    pub ultimate_loss: Money,
    pub paid_loss: Money,
    pub reserves: Money,
}

/// Complete the triangle with age-to-age factors and project reserves.
pub fn chain_ladder(
    triangle: &ClaimsTriangle,
) -> FinCalcResult<ComputationOutput<ChainLadderOutput>> {
    let start = Instant::now();
    let factors = development_factors(triangle)?;

    let mut completed = Vec::with_capacity(triangle.n_rows());
    for row in triangle.rows() {
        let mut filled: Vec<Decimal> = Vec::with_capacity(triangle.n_cols());
        for (j, cell) in row.iter().enumerate() {
            let value = match cell {
                Some(v) => *v,
                // j > 0 here: the first period is always observed
                None => filled[j - 1] * factors[j - 1],
            };
            filled.push(value);
        }
        completed.push(filled);
    }

    let last = triangle.n_cols() - 1;
    let ultimate_loss: Decimal = completed.iter().map(|row| row[last]).sum();
    let paid_loss: Decimal = completed
        .iter()
        .flat_map(|row| &row[..last])
        .sum();
    let reserves = ultimate_loss - paid_loss;

    let mut warnings = Vec::new();
    if reserves < Decimal::ZERO {
        warnings.push(format!(
            "Projected reserves are negative ({}); paid development exceeds the ultimate column",
            reserves
        ));
    }

    let result = ChainLadderOutput {
        development_factors: factors,
        completed,
        ultimate_loss,
        paid_loss,
        reserves,
    };

    let assumptions = json!({
        "factor_basis": "volume_weighted_all_but_latest_row",
        "excludes_ibnr": true,
    });

    Ok(with_metadata(
        "Chain Ladder reserve projection",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}
