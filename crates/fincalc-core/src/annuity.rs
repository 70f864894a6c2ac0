//! Annuity valuation under daily compounding.
//!
//! An annual contribution is spread evenly over the days between two dates
//! and every daily slice is compounded (or discounted) at the effective
//! daily rate. Future value, present value and the effective annual return
//! fall out of the same accumulation pass.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total contribution over the period, spread evenly across its days
    pub annual_contribution: Money,
    /// Nominal annual rate as a percentage (8.0 = 8%)
    pub nominal_rate_pct: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityOutput {
    pub num_days: i64,
    pub daily_payment: Money,
    pub future_value: Money,
    pub present_value: Money,
    pub total_gain: Money,
    /// FV/PV − 1 over the period
    pub effective_return: Rate,
}

/// Value a stream of daily contributions between two dates.
pub fn value(input: &AnnuityInput) -> FinCalcResult<ComputationOutput<AnnuityOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let num_days = (input.end_date - input.start_date).num_days();
    let daily_payment = input.annual_contribution / Decimal::from(num_days);
    let daily_rate = input.nominal_rate_pct / dec!(100) / Decimal::from(num_days);
    let one_plus_d = Decimal::ONE + daily_rate;

    // Single running factor: (1+d)^i is carried forward multiplicatively
    // rather than recomputed per day.
    let mut factor = Decimal::ONE;
    let mut fv_sum = Decimal::ZERO;
    let mut pv_sum = Decimal::ZERO;
    for _ in 0..num_days {
        fv_sum += factor;
        pv_sum += Decimal::ONE / factor;
        factor = factor
            .checked_mul(one_plus_d)
            .ok_or_else(|| FinCalcError::NumericOverflow {
                context: "annuity compounding factor".to_string(),
            })?;
    }

    let future_value = daily_payment * fv_sum;
    let present_value = daily_payment * pv_sum;
    if present_value.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "annuity present value".to_string(),
        });
    }
    let effective_return = future_value / present_value - Decimal::ONE;

    let result = AnnuityOutput {
        num_days,
        daily_payment,
        future_value,
        present_value,
        total_gain: future_value - present_value,
        effective_return,
    };

    let assumptions = json!({
        "daily_rate": daily_rate,
        "compounding": "daily",
        "day_count": "actual",
    });

    Ok(with_metadata(
        "Daily-compounded annuity accumulation",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn validate_input(input: &AnnuityInput) -> FinCalcResult<()> {
    if input.start_date >= input.end_date {
        return Err(FinCalcError::InvalidDateRange {
            start: input.start_date,
            end: input.end_date,
        });
    }
    if input.annual_contribution <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "annual_contribution".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if input.nominal_rate_pct < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "nominal_rate_pct".to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}
