//! Return-series derivation and alignment.

use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// A named level series (prices, index values, rates) in observation order,
/// oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSeries {
    pub name: String,
    pub levels: Vec<f64>,
}

/// How a macro factor moves against the stock. Fixed at construction:
/// inflation, interest rates and bond yields are inverse, exchange rates
/// direct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorInfluence {
    Direct,
    Inverse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroFactor {
    pub series: RawSeries,
    pub influence: FactorInfluence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedFactor {
    pub name: String,
    pub influence: FactorInfluence,
    pub returns: Vec<f64>,
}

/// Stock and factor returns truncated to a common horizon, keeping the most
/// recent observations of every series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedReturns {
    pub stock: Vec<f64>,
    pub factors: Vec<AlignedFactor>,
    pub horizon: usize,
}

/// Derive period-over-period returns for every series and right-align them
/// to the shortest one.
pub fn align(stock: &RawSeries, factors: &[MacroFactor]) -> FinCalcResult<AlignedReturns> {
    let stock_returns = pct_changes(stock)?;

    let mut factor_returns = Vec::with_capacity(factors.len());
    for factor in factors {
        factor_returns.push((
            factor.series.name.clone(),
            factor.influence,
            pct_changes(&factor.series)?,
        ));
    }

    let horizon = factor_returns
        .iter()
        .map(|(_, _, r)| r.len())
        .chain(std::iter::once(stock_returns.len()))
        .min()
        .unwrap_or(0);

    let factors = factor_returns
        .into_iter()
        .map(|(name, influence, returns)| AlignedFactor {
            name,
            influence,
            returns: tail(returns, horizon),
        })
        .collect();

    Ok(AlignedReturns {
        stock: tail(stock_returns, horizon),
        factors,
        horizon,
    })
}

/// Keep the last `n` elements.
fn tail(mut v: Vec<f64>, n: usize) -> Vec<f64> {
    v.split_off(v.len() - n)
}

fn pct_changes(series: &RawSeries) -> FinCalcResult<Vec<f64>> {
    if series.levels.len() < 2 {
        return Err(FinCalcError::InsufficientData(format!(
            "series '{}' needs at least 2 observations to derive returns",
            series.name
        )));
    }
    Ok(series
        .levels
        .windows(2)
        .map(|w| {
            let r = (w[1] - w[0]) / w[0];
            // A zero base level yields no usable return for that period
            if r.is_finite() {
                r
            } else {
                0.0
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, levels: &[f64]) -> RawSeries {
        RawSeries {
            name: name.to_string(),
            levels: levels.to_vec(),
        }
    }

    #[test]
    fn derives_one_fewer_return_than_levels() {
        let aligned = align(&series("stk", &[100.0, 110.0, 99.0]), &[]).unwrap();
        assert_eq!(aligned.horizon, 2);
        assert!((aligned.stock[0] - 0.10).abs() < 1e-12);
        assert!((aligned.stock[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn truncation_keeps_most_recent_observations() {
        let stock = series("stk", &[100.0, 102.0, 101.0, 105.0, 107.0, 110.0, 108.0, 112.0]);
        let cpi = MacroFactor {
            series: series("cpi", &[5.0, 5.1, 5.3, 5.2, 5.4, 5.5]),
            influence: FactorInfluence::Inverse,
        };
        let aligned = align(&stock, &[cpi]).unwrap();

        // cpi: 6 levels → 5 returns; stock truncates from 7 down to 5
        assert_eq!(aligned.horizon, 5);
        assert_eq!(aligned.stock.len(), 5);
        assert_eq!(aligned.factors[0].returns.len(), 5);
        // First surviving stock return is (105 − 101) / 101
        assert!((aligned.stock[0] - 4.0 / 101.0).abs() < 1e-12);
    }

    #[test]
    fn factor_influence_survives_alignment() {
        let stock = series("stk", &[1.0, 2.0, 3.0]);
        let fx = MacroFactor {
            series: series("fx", &[18.0, 18.5, 18.2]),
            influence: FactorInfluence::Direct,
        };
        let aligned = align(&stock, &[fx]).unwrap();
        assert_eq!(aligned.factors[0].influence, FactorInfluence::Direct);
        assert_eq!(aligned.factors[0].name, "fx");
    }

    #[test]
    fn single_observation_is_insufficient() {
        let err = align(&series("stk", &[42.0]), &[]).unwrap_err();
        assert!(matches!(err, FinCalcError::InsufficientData(_)));
    }

    #[test]
    fn short_factor_series_is_insufficient() {
        let stock = series("stk", &[1.0, 2.0, 3.0]);
        let bad = MacroFactor {
            series: series("rate", &[7.5]),
            influence: FactorInfluence::Inverse,
        };
        assert!(align(&stock, &[bad]).is_err());
    }

    #[test]
    fn zero_base_level_contributes_no_return() {
        let aligned = align(&series("stk", &[0.0, 5.0, 10.0]), &[]).unwrap();
        assert_eq!(aligned.stock[0], 0.0);
        assert!((aligned.stock[1] - 1.0).abs() < 1e-12);
    }
}
