//! Single Simulation Run Binary
//!
//! Runs one configured simulation and prints a report.
//!
//! ## Usage
//! ```bash
//! cargo run --bin simulate --release -- [--config PATH] [--csv PATH] [--json PATH] [--tail N]
//! ```

use std::fs::File;
use std::io::BufWriter;

use peg_simulation::report::{print_series_tail, print_summary, write_csv, write_json};
use peg_simulation::{Simulation, SimulationConfig};

fn print_help() {
    eprintln!(
        r#"Stabilized token simulation

USAGE:
    simulate [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --csv <PATH>        Write every series to a CSV file
    --json <PATH>       Write the full state as JSON
    --tail <N>          Rows of the series table to print (default: 10)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (e.g. debug to see ceiling hits)
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut csv_path: Option<String> = None;
    let mut json_path: Option<String> = None;
    let mut tail = 10;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            print_help();
            return Ok(());
        }

        i += 1;
        let Some(value) = args.get(i) else {
            eprintln!("Error: {} requires an argument", flag);
            std::process::exit(1);
        };
        match flag {
            "--config" | "-c" => config_path = Some(value.clone()),
            "--csv" => csv_path = Some(value.clone()),
            "--json" => json_path = Some(value.clone()),
            "--tail" => tail = value.parse()?,
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => SimulationConfig::default(),
    };

    let mut sim = Simulation::new(config)?;

    println!("=======================================================");
    println!("  Stabilized Token Simulation");
    println!("  Price process: {}", sim.config().price_generator.name());
    println!("=======================================================");
    println!();
    println!("{}", sim.config().params.describe());
    println!("  Steps: {}, Seed: {:?}", sim.config().steps, sim.config().seed);
    println!();

    let summary = sim.run();

    print_series_tail(sim.state(), tail);
    println!();
    println!("Summary:");
    println!("{}", "-".repeat(50));
    print_summary(&summary);

    if let Some(path) = csv_path {
        write_csv(sim.state(), BufWriter::new(File::create(&path)?))?;
        log::info!("Wrote series to {}", path);
    }
    if let Some(path) = json_path {
        write_json(sim.state(), BufWriter::new(File::create(&path)?))?;
        log::info!("Wrote state to {}", path);
    }

    Ok(())
}
