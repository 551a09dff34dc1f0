//! Monte Carlo Stress Testing Binary
//!
//! Repeats the random-walk run under many seeds and reports peg statistics.
//!
//! ## Usage
//! ```bash
//! cargo run --bin monte_carlo --release -- [--runs N] [--seed S] [--config PATH]
//! ```

use peg_simulation::monte_carlo::run_monte_carlo;
use peg_simulation::{PriceGenerator, SimulationConfig};

const SIMULATION_RUNS: usize = 10_000;

fn print_help() {
    eprintln!(
        r#"Monte Carlo stress testing for the stabilized token

USAGE:
    monte_carlo [OPTIONS]

OPTIONS:
    --runs <N>          Number of seeded runs (default: 10000)
    --seed <S>          First seed; run i uses S + i (default: 0)
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter
"#
    );
}

struct Options {
    runs: usize,
    base_seed: u64,
    config_path: Option<String>,
}

/// `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        runs: SIMULATION_RUNS,
        base_seed: 0,
        config_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            return Ok(None);
        }

        i += 1;
        let value = args
            .get(i)
            .ok_or_else(|| format!("{} requires an argument", flag))?;
        match flag {
            "--runs" => {
                options.runs = value
                    .parse()
                    .map_err(|e| format!("invalid --runs '{}': {}", value, e))?
            }
            "--seed" => {
                options.base_seed = value
                    .parse()
                    .map_err(|e| format!("invalid --seed '{}': {}", value, e))?
            }
            "--config" | "-c" => options.config_path = Some(value.clone()),
            arg => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    Ok(Some(options))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    let config = match &options.config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::with_generator(PriceGenerator::random_walk()),
    };
    let (runs, base_seed) = (options.runs, options.base_seed);

    println!("=======================================================");
    println!("  Monte Carlo Stress Testing");
    println!("  Stabilized Token under {}", config.price_generator.name());
    println!("=======================================================");
    println!();
    println!("{}", config.params.describe());
    println!("  Runs: {}, Steps per run: {}, Base seed: {}", runs, config.steps, base_seed);
    println!();

    let result = run_monte_carlo(&config, runs, base_seed)?;
    result.print();

    Ok(())
}
