use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::annuity::{self, AnnuityInput};

use crate::input;

/// Arguments for annuity valuation
#[derive(Args)]
pub struct AnnuityArgs {
    /// Start of the contribution period (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// End of the contribution period (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Total contribution over the period
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Nominal annual rate as a percentage (8 = 8%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_annuity(args: AnnuityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let annuity_input: AnnuityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AnnuityInput {
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
            end_date: args
                .end_date
                .ok_or("--end-date is required (or provide --input)")?,
            annual_contribution: args
                .contribution
                .ok_or("--contribution is required (or provide --input)")?,
            nominal_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        }
    };

    let output = annuity::value(&annuity_input)?;
    Ok(serde_json::to_value(&output)?)
}
