mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::AmortizeArgs;
use commands::annuity::AnnuityArgs;
use commands::fixed_income::{BondArgs, PriceArgs, TbillArgs};
use commands::reserving::{BornhuetterFergusonArgs, ChainLadderArgs};
use commands::simulation::SimulateArgs;

/// Quantitative finance and actuarial calculations
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Quantitative finance and actuarial calculations",
    long_about = "A CLI for quantitative finance and actuarial calculations with \
                  decimal precision. Supports loan amortization, annuity valuation, \
                  treasury bill and bond pricing, bootstrap Monte Carlo price \
                  projection, and claims reserving."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a loan amortization schedule
    Amortize(AmortizeArgs),
    /// Value a stream of daily annuity contributions
    Annuity(AnnuityArgs),
    /// Price a treasury bill from its auction yield
    Tbill(TbillArgs),
    /// Price a par bond and lay out its coupon schedule
    Bond(BondArgs),
    /// Price an instrument described by a tagged JSON spec
    Price(PriceArgs),
    /// Project terminal prices with a correlation-weighted bootstrap
    Simulate(SimulateArgs),
    /// Chain Ladder reserve projection over a claims triangle
    ChainLadder(ChainLadderArgs),
    /// Bornhuetter-Ferguson reserve projection
    #[command(alias = "bf")]
    BornhuetterFerguson(BornhuetterFergusonArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Annuity(args) => commands::annuity::run_annuity(args),
        Commands::Tbill(args) => commands::fixed_income::run_tbill(args),
        Commands::Bond(args) => commands::fixed_income::run_bond(args),
        Commands::Price(args) => commands::fixed_income::run_price(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::ChainLadder(args) => commands::reserving::run_chain_ladder(args),
        Commands::BornhuetterFerguson(args) => {
            commands::reserving::run_bornhuetter_ferguson(args)
        }
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
