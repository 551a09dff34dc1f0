//! Stabilized Token Simulation Library
//!
//! Discrete-time model of a collateral-backed token held near a $1 peg.
//! Each step an exogenous collateral price drives momentum, redemption, a
//! decaying base fee, and a market-clearing token price under the quantity
//! theory of money, with a hard ceiling at 1.1.
//!
//! ## Modules
//!
//! - `params`: model parameters and run configuration (JSON loadable)
//! - `price`: exogenous collateral price processes
//! - `state`: aligned time series for one run
//! - `engine`: the pure step function
//! - `driver`: sequences steps for one run
//! - `report`: console, CSV and JSON output
//! - `monte_carlo`: seeded batch runs with tail statistics
//!
//! ## Usage
//!
//! ```bash
//! # Single run, optionally from a JSON config
//! cargo run --bin simulate --release -- --config run.json --csv series.csv
//!
//! # Compare every price process
//! cargo run --bin scenarios --release
//!
//! # Random-walk stress statistics
//! cargo run --bin monte_carlo --release -- --runs 1000
//! ```

pub mod driver;
pub mod engine;
pub mod error;
pub mod monte_carlo;
pub mod params;
pub mod price;
pub mod report;
pub mod state;

pub use driver::{run_simulation, RunSummary, Simulation};
pub use engine::{StepOutcome, PRICE_CEILING};
pub use error::ConfigError;
pub use params::{Parameters, SimulationConfig};
pub use price::{ExogenousPrice, PriceGenerator, PriceProcess};
pub use state::{SeedState, SimulationState, StepValues};
