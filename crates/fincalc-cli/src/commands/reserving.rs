use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use fincalc_core::reserving::{self, BornhuetterFergusonInput, ClaimsTriangle};

use crate::input;

/// Flat triangle upload: zero stands for not-yet-observed.
#[derive(Deserialize)]
struct TriangleFile {
    rows: Vec<Vec<Decimal>>,
}

/// Arguments for the Chain Ladder projection
#[derive(Args)]
pub struct ChainLadderArgs {
    /// Path to a JSON file with the claims triangle rows
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the Bornhuetter-Ferguson projection
#[derive(Args)]
pub struct BornhuetterFergusonArgs {
    /// Path to a JSON file with the claims triangle rows
    #[arg(long)]
    pub input: Option<String>,

    /// Earned premium per accident row, comma separated
    #[arg(long, value_delimiter = ',')]
    pub premiums: Option<Vec<Decimal>>,

    /// Seed for the premium simulation when no premiums are given
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_chain_ladder(args: ChainLadderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let triangle = load_triangle(&args.input)?;
    let output = reserving::chain_ladder(&triangle)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_bornhuetter_ferguson(
    args: BornhuetterFergusonArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let bf_input = BornhuetterFergusonInput {
        triangle: load_triangle(&args.input)?,
        premiums: args.premiums,
        seed: args.seed,
    };
    let output = reserving::bornhuetter_ferguson(&bf_input)?;
    Ok(serde_json::to_value(&output)?)
}

fn load_triangle(path: &Option<String>) -> Result<ClaimsTriangle, Box<dyn std::error::Error>> {
    let file: TriangleFile = if let Some(path) = path {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe JSON via stdin)".into());
    };
    Ok(ClaimsTriangle::from_rows(file.rows)?)
}
