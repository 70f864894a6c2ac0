//! Par bond pricing with a semi-annual coupon schedule.
//!
//! Government bonds here are bought at par: the price equals the invested
//! face value and the return comes entirely from the coupon stream. Coupons
//! run on a 182-day cycle from the purchase date and carry withholding tax;
//! the final scheduled payment redeems the principal.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{validate_lot, HANDLING_FEE_PCT, WITHHOLDING_TAX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    /// Face value purchased at par, in lots of 5000
    pub investment: Money,
    /// Tenor in whole years; coupons pay twice per year
    pub term_years: u32,
    /// Annual coupon rate as a percentage
    pub coupon_rate_pct: Rate,
    /// Auction yield as a percentage, recorded with the result
    pub yield_rate_pct: Rate,
    pub purchase_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponPayment {
    pub date: NaiveDate,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondOutput {
    /// Par purchase: price equals face value
    pub bond_price: Money,
    pub cost_after_fee: Money,
    pub semi_annual_coupon: Money,
    pub coupon_after_tax: Money,
    /// Principal plus every after-tax coupon over the life of the bond
    pub total_return: Money,
    pub coupon_schedule: Vec<CouponPayment>,
}

/// Price a par bond and lay out its coupon schedule.
pub fn price_bond(input: &BondInput) -> FinCalcResult<ComputationOutput<BondOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let bond_price = input.investment;
    let cost_after_fee = bond_price * (Decimal::ONE - HANDLING_FEE_PCT);

    // Each coupon covers a 182-day period of the annual rate
    let semi_annual_coupon =
        input.investment * (input.coupon_rate_pct / dec!(100)) * (dec!(182) / dec!(365));
    let coupon_after_tax = semi_annual_coupon * (Decimal::ONE - WITHHOLDING_TAX);

    let num_coupons = 2 * input.term_years;
    let mut coupon_schedule = Vec::with_capacity(num_coupons as usize);
    for i in 1..=num_coupons {
        let date = input.purchase_date + Duration::days(182 * i64::from(i));
        let amount = if i == num_coupons {
            // Principal redemption at maturity
            input.investment
        } else {
            coupon_after_tax.round_dp(2)
        };
        coupon_schedule.push(CouponPayment { date, amount });
    }

    let total_return = input.investment + coupon_after_tax * Decimal::from(num_coupons);

    let result = BondOutput {
        bond_price,
        cost_after_fee,
        semi_annual_coupon,
        coupon_after_tax,
        total_return,
        coupon_schedule,
    };

    let assumptions = json!({
        "pricing": "par",
        "coupon_cycle_days": 182,
        "handling_fee_pct": HANDLING_FEE_PCT,
        "withholding_tax": WITHHOLDING_TAX,
        "yield_rate_pct": input.yield_rate_pct,
    });

    Ok(with_metadata(
        "Par bond pricing with semi-annual coupons",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn validate_input(input: &BondInput) -> FinCalcResult<()> {
    validate_lot(input.investment)?;
    if input.term_years == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "term_years".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if input.coupon_rate_pct <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "coupon_rate_pct".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if input.yield_rate_pct <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "yield_rate_pct".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_year_bond() -> BondInput {
        BondInput {
            investment: dec!(10000),
            term_years: 2,
            coupon_rate_pct: dec!(10),
            yield_rate_pct: dec!(11),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn coupon_carries_tax_but_not_fee() {
        let out = price_bond(&two_year_bond()).unwrap();
        let result = &out.result;
        // 10000 · 0.10 · 182/365 = 498.6301…, taxed at 15%
        assert_eq!(result.semi_annual_coupon.round_dp(2), dec!(498.63));
        assert_eq!(result.coupon_after_tax.round_dp(2), dec!(423.84));
        assert_eq!(
            result.coupon_after_tax,
            result.semi_annual_coupon * dec!(0.85)
        );
    }

    #[test]
    fn fee_applies_to_cost_only() {
        let out = price_bond(&two_year_bond()).unwrap();
        let result = &out.result;
        assert_eq!(result.bond_price, dec!(10000));
        assert_eq!(result.cost_after_fee, dec!(9900));
    }

    #[test]
    fn total_return_sums_principal_and_coupons() {
        let out = price_bond(&two_year_bond()).unwrap();
        let result = &out.result;
        assert_eq!(
            result.total_return,
            dec!(10000) + result.coupon_after_tax * dec!(4)
        );
        assert_eq!(result.total_return.round_dp(2), dec!(11695.34));
    }

    #[test]
    fn schedule_runs_on_182_day_cycle() {
        let out = price_bond(&two_year_bond()).unwrap();
        let schedule = &out.result.coupon_schedule;
        assert_eq!(schedule.len(), 4);

        let purchase = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for (i, payment) in schedule.iter().enumerate() {
            let expected = purchase + Duration::days(182 * (i as i64 + 1));
            assert_eq!(payment.date, expected);
        }
    }

    #[test]
    fn final_payment_redeems_principal() {
        let out = price_bond(&two_year_bond()).unwrap();
        let schedule = &out.result.coupon_schedule;
        assert_eq!(schedule.last().unwrap().amount, dec!(10000));
        for payment in &schedule[..schedule.len() - 1] {
            assert_eq!(payment.amount, dec!(423.84));
        }
    }

    #[test]
    fn rejects_off_lot_investment() {
        let input = BondInput {
            investment: dec!(10001),
            ..two_year_bond()
        };
        assert!(price_bond(&input).is_err());
    }

    #[test]
    fn rejects_zero_term() {
        let input = BondInput {
            term_years: 0,
            ..two_year_bond()
        };
        assert!(price_bond(&input).is_err());
    }

    #[test]
    fn rejects_zero_coupon_rate() {
        let input = BondInput {
            coupon_rate_pct: Decimal::ZERO,
            ..two_year_bond()
        };
        assert!(price_bond(&input).is_err());
    }
}
