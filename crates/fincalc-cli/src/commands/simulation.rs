use clap::Args;
use serde_json::Value;

use fincalc_core::simulation::{self, SimulationInput};

use crate::input;

/// Arguments for the bootstrap price projection
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a JSON file with the stock and macro factor series
    #[arg(long)]
    pub input: Option<String>,

    /// Number of bootstrap paths (defaults to 10000)
    #[arg(long)]
    pub runs: Option<u32>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Include every terminal price in the output
    #[arg(long)]
    pub include_paths: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe JSON via stdin)".into());
    };

    if let Some(runs) = args.runs {
        sim_input.runs = runs;
    }
    if let Some(seed) = args.seed {
        sim_input.seed = Some(seed);
    }

    let output = simulation::simulate(&sim_input)?;
    let summary = output.result.summary();

    let mut value = serde_json::to_value(&output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.insert("summary".to_string(), serde_json::to_value(summary)?);
        // The raw path dump is large; only emit it on request
        if !args.include_paths {
            result.remove("terminal_prices");
        }
    }
    Ok(value)
}
