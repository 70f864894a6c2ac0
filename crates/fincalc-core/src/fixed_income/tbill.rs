//! Treasury bill discount pricing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{validate_lot, HANDLING_FEE_PCT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryBillInput {
    /// Face value purchased, in lots of 5000
    pub investment: Money,
    /// Tenor in days (91, 182, 273, 364 at auction)
    pub term_days: u32,
    /// Annual discount yield as a percentage
    pub yield_pct: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryBillOutput {
    /// Price per 100 of face value
    pub unit_price: Money,
    pub cost: Money,
    pub cost_after_fee: Money,
    /// Face value received at maturity minus what was paid
    pub interest: Money,
}

/// Price a treasury bill from its auction yield.
pub fn price_treasury_bill(
    input: &TreasuryBillInput,
) -> FinCalcResult<ComputationOutput<TreasuryBillOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let annual_yield = input.yield_pct / dec!(100);
    let tenor_fraction = Decimal::from(input.term_days) / dec!(365);
    let unit_price = dec!(100) / (Decimal::ONE + tenor_fraction * annual_yield);

    let cost = input.investment * unit_price / dec!(100);
    let cost_after_fee = cost * (Decimal::ONE - HANDLING_FEE_PCT);
    let interest = input.investment - cost_after_fee;

    let result = TreasuryBillOutput {
        unit_price,
        cost,
        cost_after_fee,
        interest,
    };

    let assumptions = json!({
        "day_count": "actual/365",
        "handling_fee_pct": HANDLING_FEE_PCT,
        "tenor_fraction": tenor_fraction,
    });

    Ok(with_metadata(
        "Treasury bill discount pricing",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn validate_input(input: &TreasuryBillInput) -> FinCalcResult<()> {
    validate_lot(input.investment)?;
    if input.term_days == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "term_days".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if input.yield_pct <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "yield_pct".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ninety_one_day_bill() -> TreasuryBillInput {
        TreasuryBillInput {
            investment: dec!(100000),
            term_days: 91,
            yield_pct: dec!(10),
        }
    }

    #[test]
    fn prices_below_par() {
        let out = price_treasury_bill(&ninety_one_day_bill()).unwrap();
        let result = &out.result;
        assert!(result.unit_price < dec!(100));
        assert!(result.unit_price > dec!(97));
        // 100 / (1 + 91/365 · 0.10) ≈ 97.5675
        assert_eq!(result.unit_price.round_dp(4), dec!(97.5675));
    }

    #[test]
    fn fee_and_interest_hang_together() {
        let out = price_treasury_bill(&ninety_one_day_bill()).unwrap();
        let result = &out.result;
        assert_eq!(result.cost_after_fee, result.cost * dec!(0.99));
        assert_eq!(result.interest, dec!(100000) - result.cost_after_fee);
        assert!(result.interest > dec!(3400) && result.interest < dec!(3420));
    }

    #[test]
    fn longer_tenor_means_deeper_discount() {
        let short = price_treasury_bill(&ninety_one_day_bill()).unwrap();
        let long = price_treasury_bill(&TreasuryBillInput {
            term_days: 364,
            ..ninety_one_day_bill()
        })
        .unwrap();
        assert!(long.result.unit_price < short.result.unit_price);
        assert!(long.result.interest > short.result.interest);
    }

    #[test]
    fn higher_yield_means_lower_price() {
        let mut last_price = dec!(100);
        for yield_pct in [dec!(5), dec!(10), dec!(15), dec!(20)] {
            let out = price_treasury_bill(&TreasuryBillInput {
                yield_pct,
                ..ninety_one_day_bill()
            })
            .unwrap();
            assert!(out.result.unit_price < last_price);
            last_price = out.result.unit_price;
        }
    }

    #[test]
    fn rejects_off_lot_investment() {
        let input = TreasuryBillInput {
            investment: dec!(100001),
            ..ninety_one_day_bill()
        };
        assert!(matches!(
            price_treasury_bill(&input).unwrap_err(),
            FinCalcError::InvalidInput { ref field, .. } if field == "investment"
        ));
    }

    #[test]
    fn rejects_zero_yield() {
        let input = TreasuryBillInput {
            yield_pct: Decimal::ZERO,
            ..ninety_one_day_bill()
        };
        assert!(price_treasury_bill(&input).is_err());
    }

    #[test]
    fn rejects_zero_term() {
        let input = TreasuryBillInput {
            term_days: 0,
            ..ninety_one_day_bill()
        };
        assert!(price_treasury_bill(&input).is_err());
    }
}
