use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::fixed_income::{self, BondInput, InstrumentSpec, TreasuryBillInput};

use crate::input;

/// Arguments for treasury bill pricing
#[derive(Args)]
pub struct TbillArgs {
    /// Face value purchased, in lots of 5000
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Tenor in days (91, 182, 273 or 364 at auction)
    #[arg(long)]
    pub term_days: Option<u32>,

    /// Annual discount yield as a percentage
    #[arg(long = "yield")]
    pub yield_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for par bond pricing
#[derive(Args)]
pub struct BondArgs {
    /// Face value purchased at par, in lots of 5000
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Tenor in whole years
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual coupon rate as a percentage
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Auction yield as a percentage
    #[arg(long)]
    pub yield_rate: Option<Decimal>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for tagged-spec pricing
#[derive(Args)]
pub struct PriceArgs {
    /// Path to a JSON instrument spec with an "instrument" tag
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_tbill(args: TbillArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tbill_input: TreasuryBillInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TreasuryBillInput {
            investment: args
                .investment
                .ok_or("--investment is required (or provide --input)")?,
            term_days: args
                .term_days
                .ok_or("--term-days is required (or provide --input)")?,
            yield_pct: args
                .yield_pct
                .ok_or("--yield is required (or provide --input)")?,
        }
    };

    let output = fixed_income::price_treasury_bill(&tbill_input)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: BondInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        BondInput {
            investment: args
                .investment
                .ok_or("--investment is required (or provide --input)")?,
            term_years: args.years.ok_or("--years is required (or provide --input)")?,
            coupon_rate_pct: args
                .coupon_rate
                .ok_or("--coupon-rate is required (or provide --input)")?,
            yield_rate_pct: args
                .yield_rate
                .ok_or("--yield-rate is required (or provide --input)")?,
            purchase_date: args
                .purchase_date
                .ok_or("--purchase-date is required (or provide --input)")?,
        }
    };

    let output = fixed_income::price_bond(&bond_input)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spec: InstrumentSpec = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe JSON via stdin)".into());
    };

    let output = fixed_income::price_instrument(&spec)?;
    Ok(serde_json::to_value(&output)?)
}
