//! Claims development triangle and its age-to-age factors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// Cumulative claims by accident row and development period. `None` marks a
/// cell that has not been observed yet; observed rows run oldest first.
///
/// Deserialization funnels through [`ClaimsTriangle::new`], so a triangle in
/// hand always satisfies the shape invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTriangle")]
pub struct ClaimsTriangle {
    values: Vec<Vec<Option<Decimal>>>,
}

#[derive(Deserialize)]
struct RawTriangle {
    values: Vec<Vec<Option<Decimal>>>,
}

impl TryFrom<RawTriangle> for ClaimsTriangle {
    type Error = FinCalcError;

    fn try_from(raw: RawTriangle) -> Result<Self, Self::Error> {
        Self::new(raw.values)
    }
}

impl ClaimsTriangle {
    pub fn new(values: Vec<Vec<Option<Decimal>>>) -> FinCalcResult<Self> {
        if values.len() < 2 {
            return Err(FinCalcError::InsufficientData(
                "triangle needs at least 2 accident rows".to_string(),
            ));
        }
        let n_cols = values[0].len();
        if n_cols < 2 {
            return Err(FinCalcError::InsufficientData(
                "triangle needs at least 2 development periods".to_string(),
            ));
        }
        for (i, row) in values.iter().enumerate() {
            if row.len() != n_cols {
                return Err(FinCalcError::InvalidInput {
                    field: "values".to_string(),
                    reason: format!("row {} has {} cells, expected {}", i, row.len(), n_cols),
                });
            }
            if row[0].is_none() {
                return Err(FinCalcError::InvalidInput {
                    field: "values".to_string(),
                    reason: format!("row {} has no first-period observation", i),
                });
            }
        }
        Ok(Self { values })
    }

    /// Build from a flat upload where zero stands for not-yet-observed.
    pub fn from_rows(rows: Vec<Vec<Decimal>>) -> FinCalcResult<Self> {
        let values = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| if v.is_zero() { None } else { Some(v) })
                    .collect()
            })
            .collect();
        Self::new(values)
    }

    pub fn n_rows(&self) -> usize {
        self.values.len()
    }

    pub fn n_cols(&self) -> usize {
        self.values[0].len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Decimal> {
        self.values[row][col]
    }

    pub fn rows(&self) -> &[Vec<Option<Decimal>>] {
        &self.values
    }

    /// Most developed observation in a row.
    pub fn latest_observed(&self, row: usize) -> Option<Decimal> {
        self.values[row].iter().rev().flatten().next().copied()
    }

    /// Sum of the observed cells in a row.
    pub fn row_total(&self, row: usize) -> Decimal {
        self.values[row].iter().flatten().sum()
    }
}

/// Age-to-age development factors: LDF[j] = Σ col j+1 / Σ col j over rows
/// where both cells are observed. The most recent accident row is always
/// excluded; it has nothing to develop toward.
pub fn development_factors(triangle: &ClaimsTriangle) -> FinCalcResult<Vec<Decimal>> {
    let n_rows = triangle.n_rows();
    let mut factors = Vec::with_capacity(triangle.n_cols() - 1);

    for j in 0..triangle.n_cols() - 1 {
        let mut numerator = Decimal::ZERO;
        let mut denominator = Decimal::ZERO;
        for i in 0..n_rows - 1 {
            if let (Some(current), Some(next)) = (triangle.cell(i, j), triangle.cell(i, j + 1)) {
                numerator += next;
                denominator += current;
            }
        }
        if denominator.is_zero() {
            return Err(FinCalcError::DegenerateTriangle { transition: j });
        }
        factors.push(numerator / denominator);
    }
    Ok(factors)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// 3 accident rows, 3 development periods, bottom-right unobserved.
    pub(crate) fn triangle_3x3() -> ClaimsTriangle {
        ClaimsTriangle::from_rows(vec![
            vec![dec!(100), dec!(150), dec!(200)],
            vec![dec!(120), dec!(180), dec!(0)],
            vec![dec!(140), dec!(0), dec!(0)],
        ])
        .unwrap()
    }

    /// 4x4 with a strictly upper-triangular observed region.
    pub(crate) fn triangle_4x4() -> ClaimsTriangle {
        ClaimsTriangle::from_rows(vec![
            vec![dec!(1000), dec!(1500), dec!(1800), dec!(1900)],
            vec![dec!(1100), dec!(1650), dec!(1980), dec!(0)],
            vec![dec!(1200), dec!(1800), dec!(0), dec!(0)],
            vec![dec!(1300), dec!(0), dec!(0), dec!(0)],
        ])
        .unwrap()
    }

    #[test]
    fn from_rows_turns_zeros_into_unobserved() {
        let tri = triangle_3x3();
        assert_eq!(tri.cell(1, 2), None);
        assert_eq!(tri.cell(2, 1), None);
        assert_eq!(tri.cell(0, 2), Some(dec!(200)));
    }

    #[test]
    fn latest_observed_walks_back_over_gaps() {
        let tri = triangle_3x3();
        assert_eq!(tri.latest_observed(0), Some(dec!(200)));
        assert_eq!(tri.latest_observed(1), Some(dec!(180)));
        assert_eq!(tri.latest_observed(2), Some(dec!(140)));
    }

    #[test]
    fn row_total_sums_observed_cells_only() {
        let tri = triangle_3x3();
        assert_eq!(tri.row_total(0), dec!(450));
        assert_eq!(tri.row_total(1), dec!(300));
        assert_eq!(tri.row_total(2), dec!(140));
    }

    #[test]
    fn factors_exclude_the_most_recent_row() {
        let tri = triangle_3x3();
        let ldf = development_factors(&tri).unwrap();
        // Transition 0 uses rows 0 and 1 only: (150+180)/(100+120) = 1.5
        assert_eq!(ldf.len(), 2);
        assert_eq!(ldf[0], dec!(1.5));
        // Transition 1 has only row 0 fully observed: 200/150
        assert_eq!(ldf[1].round_dp(6), dec!(1.333333));
    }

    #[test]
    fn factors_skip_rows_missing_either_cell() {
        let tri = triangle_4x4();
        let ldf = development_factors(&tri).unwrap();
        assert_eq!(ldf[0], dec!(1.5));
        assert_eq!(ldf[1], dec!(1.2));
        // Final transition rests on row 0 alone
        assert_eq!(ldf[2].round_dp(6), dec!(1.055556));
    }

    #[test]
    fn all_unobserved_transition_is_degenerate() {
        let tri = ClaimsTriangle::from_rows(vec![
            vec![dec!(100), dec!(0), dec!(0)],
            vec![dec!(120), dec!(0), dec!(0)],
            vec![dec!(140), dec!(0), dec!(0)],
        ])
        .unwrap();
        assert!(matches!(
            development_factors(&tri).unwrap_err(),
            FinCalcError::DegenerateTriangle { transition: 0 }
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = ClaimsTriangle::from_rows(vec![
            vec![dec!(100), dec!(150)],
            vec![dec!(120)],
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn single_row_is_insufficient() {
        let result = ClaimsTriangle::from_rows(vec![vec![dec!(100), dec!(150)]]);
        assert!(matches!(
            result.unwrap_err(),
            FinCalcError::InsufficientData(_)
        ));
    }

    #[test]
    fn deserialization_enforces_shape_invariants() {
        assert!(serde_json::from_str::<ClaimsTriangle>(r#"{"values": []}"#).is_err());
        assert!(serde_json::from_str::<ClaimsTriangle>(
            r#"{"values": [["100", "150"], ["120"]]}"#
        )
        .is_err());
        assert!(serde_json::from_str::<ClaimsTriangle>(
            r#"{"values": [["100", "150"], [null, "180"]]}"#
        )
        .is_err());
    }

    #[test]
    fn valid_triangle_round_trips_through_serde() {
        let tri = triangle_3x3();
        let json = serde_json::to_string(&tri).unwrap();
        let back: ClaimsTriangle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tri);
    }

    #[test]
    fn unobserved_first_period_is_rejected() {
        let result = ClaimsTriangle::from_rows(vec![
            vec![dec!(100), dec!(150)],
            vec![dec!(0), dec!(180)],
        ]);
        assert!(result.is_err());
    }
}
