//! Reporting
//!
//! Console and file output for finished runs. The simulation core never
//! calls into this module; binaries and callers do.

use std::io::{self, Write};

use serde::Serialize;

use crate::driver::RunSummary;
use crate::state::SimulationState;

pub const CSV_HEADER: &str =
    "step,collateral_price,momentum,base_fee,redeemed_amount,token_price,vault_issuance,token_supply";

pub fn print_summary(summary: &RunSummary) {
    println!("  Steps:                   {}", summary.steps);
    println!("  Final collateral price:  {:.2}", summary.final_collateral_price);
    println!("  Final token price:       {:.4}", summary.final_token_price);
    println!("  Token price range:       {:.4} - {:.4}", summary.min_token_price, summary.max_token_price);
    println!("  Final token supply:      {:.2}", summary.final_token_supply);
    println!("  Final vault issuance:    {:.2}", summary.final_vault_issuance);
    println!("  Final base fee:          {:.5}", summary.final_base_fee);
    println!("  Max base fee:            {:.5}", summary.max_base_fee);
    println!("  Total redeemed:          {:.2}", summary.total_redeemed);
    println!("  Redemption steps:        {}", summary.redemption_steps);
    println!("  Ceiling hits:            {}", summary.ceiling_hits);
}

/// Print the last `n` steps as a table.
pub fn print_series_tail(state: &SimulationState, n: usize) {
    println!("| Step | Collateral | Momentum | Redeemed | Base Fee | Token Price | Issuance | Supply   |");
    println!("|------|------------|----------|----------|----------|-------------|----------|----------|");

    let start = state.len().saturating_sub(n);
    for i in start..state.len() {
        if let Some(v) = state.at(i) {
            println!(
                "| {:4} | {:10.2} | {:8.4} | {:8.3} | {:8.5} | {:11.4} | {:8.2} | {:8.2} |",
                i,
                v.collateral_price,
                v.momentum,
                v.redeemed_amount,
                v.base_fee,
                v.token_price,
                v.vault_issuance,
                v.token_supply,
            );
        }
    }
}

#[derive(Serialize)]
struct CsvRow {
    step: usize,
    collateral_price: f64,
    momentum: f64,
    base_fee: f64,
    redeemed_amount: f64,
    token_price: f64,
    vault_issuance: f64,
    token_supply: f64,
}

/// One header line, then one row per entry (the seed is step 0).
pub fn write_csv(state: &SimulationState, out: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for i in 0..state.len() {
        if let Some(v) = state.at(i) {
            wtr.serialize(CsvRow {
                step: i,
                collateral_price: v.collateral_price,
                momentum: v.momentum,
                base_fee: v.base_fee,
                redeemed_amount: v.redeemed_amount,
                token_price: v.token_price,
                vault_issuance: v.vault_issuance,
                token_supply: v.token_supply,
            })
            .map_err(io::Error::from)?;
        }
    }
    wtr.flush()
}

pub fn write_json(state: &SimulationState, out: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(out, state).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SimulationConfig;
    use crate::price::PriceGenerator;

    fn constant_run() -> SimulationState {
        let config = SimulationConfig {
            steps: 4,
            price_generator: PriceGenerator::Constant,
            ..Default::default()
        };
        crate::driver::run_simulation(config).unwrap().0
    }

    #[test]
    fn test_csv_has_row_per_entry() {
        let state = constant_run();
        let mut buf = Vec::new();
        write_csv(&state, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), state.len() + 1);
        assert_eq!(lines[0], CSV_HEADER);

        let seed: Vec<f64> = lines[1].split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(seed, vec![0.0, 500.0, 0.0, 0.0, 0.0, 1.0, 100.0, 100.0]);
    }

    #[test]
    fn test_json_exposes_series() {
        let state = constant_run();
        let mut buf = Vec::new();
        write_json(&state, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["token_price"].as_array().map(|a| a.len()), Some(5));
        assert_eq!(value["token_demand"], 100.0);
    }
}
