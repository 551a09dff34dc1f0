//! Price Process Comparison Binary
//!
//! Runs the model once under every collateral price process with the
//! reference parameters and compares the outcomes.
//!
//! ## Usage
//! ```bash
//! cargo run --bin scenarios --release
//! ```

use peg_simulation::report::print_summary;
use peg_simulation::{run_simulation, Parameters, PriceGenerator, SimulationConfig};

const SEED: u64 = 42;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=======================================================");
    println!("  Stabilized Token: Price Process Comparison");
    println!("=======================================================");
    println!();
    println!("{}", Parameters::default().describe());
    println!("  Steps: {}, Seed: {}", SimulationConfig::default().steps, SEED);
    println!();

    let mut rows = Vec::new();
    for generator in PriceGenerator::all_presets() {
        println!("=======================================================");
        println!("Price process: {}", generator.name());
        println!("=======================================================");

        let config = SimulationConfig {
            seed: Some(SEED),
            ..SimulationConfig::with_generator(generator)
        };
        let (_, summary) = run_simulation(config)?;
        print_summary(&summary);
        println!();

        rows.push((generator.name(), summary));
    }

    println!("| Price process       | Final Price | Min Price | Redeemed | Ceiling Hits |");
    println!("|---------------------|-------------|-----------|----------|--------------|");
    for (name, summary) in rows {
        println!(
            "| {:19} | {:11.4} | {:9.4} | {:8.2} | {:12} |",
            name,
            summary.final_token_price,
            summary.min_token_price,
            summary.total_redeemed,
            summary.ceiling_hits,
        );
    }

    Ok(())
}
