use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::amortization::{self, AmortizationInput};

use crate::input;

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (12.5 = 12.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Override the computed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.months.ok_or("--months is required (or provide --input)")?,
            monthly_payment: args.payment,
        }
    };

    let output = amortization::build_schedule(&amort_input)?;
    Ok(serde_json::to_value(&output)?)
}
