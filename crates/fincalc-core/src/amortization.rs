//! Level-payment loan amortization.
//!
//! Builds a month-by-month repayment schedule for a fixed-rate loan,
//! splitting each payment into its interest and principal portions and
//! tracking the outstanding balance to zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Loan amount disbursed at month zero
    pub principal: Money,
    /// Annual nominal rate as a percentage (12.5 = 12.5%)
    pub annual_rate_pct: Rate,
    /// Loan term in months
    pub term_months: u32,
    /// Optional payment override; when absent the level payment is derived
    /// from the annuity formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
}

/// One row of the repayment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub payment_no: u32,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub schedule: Vec<AmortizationEntry>,
    pub total_interest: Money,
    pub total_principal: Money,
    /// First payment where the principal portion overtakes the interest
    /// portion; `None` if interest dominates the whole schedule
    pub crossover_payment_no: Option<u32>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Build the full amortization schedule for a fixed-rate loan.
pub fn build_schedule(
    input: &AmortizationInput,
) -> FinCalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let mut warnings = Vec::new();
    let monthly_rate = input.annual_rate_pct / dec!(100) / dec!(12);

    let payment = match input.monthly_payment {
        Some(p) => p,
        None => level_payment(input.principal, monthly_rate, input.term_months),
    };

    // A payment that does not clear the first month's interest never
    // amortizes at all.
    let first_interest = input.principal * monthly_rate;
    if payment <= first_interest {
        return Err(FinCalcError::InvalidInput {
            field: "monthly_payment".to_string(),
            reason: format!(
                "payment {} does not exceed first-period interest {}",
                payment, first_interest
            ),
        });
    }

    let mut schedule = Vec::with_capacity(input.term_months as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut crossover = None;

    for payment_no in 1..=input.term_months {
        let interest = balance * monthly_rate;
        // The final payment absorbs any residue so the balance lands on zero
        let principal_portion = (payment - interest).min(balance);
        balance -= principal_portion;
        total_interest += interest;

        if crossover.is_none() && principal_portion > interest {
            crossover = Some(payment_no);
        }

        schedule.push(AmortizationEntry {
            payment_no,
            payment: interest + principal_portion,
            interest_portion: interest,
            principal_portion,
            remaining_balance: balance,
        });

        if balance.is_zero() && payment_no < input.term_months {
            warnings.push(format!(
                "Loan repaid after {} of {} scheduled payments",
                payment_no, input.term_months
            ));
            break;
        }
    }

    if balance > dec!(0.01) {
        warnings.push(format!(
            "Outstanding balance of {} remains after the final payment",
            balance
        ));
    }

    let total_principal = input.principal - balance;
    let result = AmortizationOutput {
        monthly_payment: payment,
        schedule,
        total_interest,
        total_principal,
        crossover_payment_no: crossover,
    };

    let assumptions = json!({
        "monthly_rate": monthly_rate,
        "payment_source": if input.monthly_payment.is_some() { "override" } else { "computed" },
        "compounding": "monthly",
    });

    Ok(with_metadata(
        "Level-payment amortization (annuity formula)",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

/// Level payment `P·r·(1+r)^n / ((1+r)^n − 1)`; straight division when r = 0.
fn level_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> Money {
    if monthly_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }
    let one_plus_r = Decimal::ONE + monthly_rate;
    let mut growth = Decimal::ONE;
    for _ in 0..term_months {
        growth *= one_plus_r;
    }
    principal * monthly_rate * growth / (growth - Decimal::ONE)
}

fn validate_input(input: &AmortizationInput) -> FinCalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "principal".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate_pct".to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    if input.term_months == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "term_months".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if let Some(p) = input.monthly_payment {
        if p <= Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "monthly_payment".to_string(),
                reason: "override must be positive".to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn standard_loan() -> AmortizationInput {
        AmortizationInput {
            principal: dec!(500000),
            annual_rate_pct: dec!(12),
            term_months: 12,
            monthly_payment: None,
        }
    }

    #[test]
    fn computes_level_payment() {
        let out = build_schedule(&standard_loan()).unwrap();
        // 500000 · 0.01 · 1.01^12 / (1.01^12 − 1)
        assert_eq!(out.result.monthly_payment.round_dp(2), dec!(44424.39));
    }

    #[test]
    fn schedule_amortizes_to_zero() {
        let out = build_schedule(&standard_loan()).unwrap();
        let result = &out.result;
        assert_eq!(result.schedule.len(), 12);
        let last = result.schedule.last().unwrap();
        assert!(last.remaining_balance.abs() < dec!(0.000001));
        assert!((result.total_principal - dec!(500000)).abs() < dec!(0.000001));
    }

    #[test]
    fn principal_portions_sum_to_principal() {
        let out = build_schedule(&standard_loan()).unwrap();
        let total: Decimal = out
            .result
            .schedule
            .iter()
            .map(|e| e.principal_portion)
            .sum();
        assert!((total - dec!(500000)).abs() < dec!(0.000001));
    }

    #[test]
    fn interest_declines_each_month() {
        let out = build_schedule(&standard_loan()).unwrap();
        let schedule = &out.result.schedule;
        for pair in schedule.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }
        assert_eq!(schedule[0].interest_portion, dec!(5000));
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let input = AmortizationInput {
            principal: dec!(120000),
            annual_rate_pct: Decimal::ZERO,
            term_months: 12,
            monthly_payment: None,
        };
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(10000));
        for entry in &out.result.schedule {
            assert_eq!(entry.interest_portion, Decimal::ZERO);
            assert_eq!(entry.principal_portion, dec!(10000));
        }
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.result.crossover_payment_no, Some(1));
    }

    #[test]
    fn crossover_marks_first_principal_dominant_payment() {
        let input = AmortizationInput {
            principal: dec!(100000),
            annual_rate_pct: dec!(24),
            term_months: 60,
            monthly_payment: None,
        };
        let out = build_schedule(&input).unwrap();
        let result = &out.result;
        let cross = result.crossover_payment_no.unwrap();
        assert!(cross > 1);
        for entry in &result.schedule {
            if entry.payment_no < cross {
                assert!(entry.principal_portion <= entry.interest_portion);
            }
        }
        let at = &result.schedule[(cross - 1) as usize];
        assert!(at.principal_portion > at.interest_portion);
    }

    #[test]
    fn payment_override_shortens_schedule() {
        let input = AmortizationInput {
            monthly_payment: Some(dec!(100000)),
            ..standard_loan()
        };
        let out = build_schedule(&input).unwrap();
        assert!(out.result.schedule.len() < 12);
        assert!(!out.warnings.is_empty());
        let last = out.result.schedule.last().unwrap();
        assert_eq!(last.remaining_balance, Decimal::ZERO);
        // Final payment is smaller than the override: it only clears what is left
        assert!(last.payment < dec!(100000));
    }

    #[test]
    fn underwater_override_is_rejected() {
        let input = AmortizationInput {
            monthly_payment: Some(dec!(4000)),
            ..standard_loan()
        };
        let err = build_schedule(&input).unwrap_err();
        assert!(matches!(
            err,
            FinCalcError::InvalidInput { ref field, .. } if field == "monthly_payment"
        ));
    }

    #[test]
    fn rejects_non_positive_principal() {
        let input = AmortizationInput {
            principal: Decimal::ZERO,
            ..standard_loan()
        };
        assert!(build_schedule(&input).is_err());
    }

    #[test]
    fn rejects_zero_term() {
        let input = AmortizationInput {
            term_months: 0,
            ..standard_loan()
        };
        assert!(build_schedule(&input).is_err());
    }

    #[test]
    fn envelope_reports_decimal_precision() {
        let out = build_schedule(&standard_loan()).unwrap();
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert!(!out.methodology.is_empty());
    }
}
