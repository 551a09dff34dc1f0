//! Simulation Driver
//!
//! Owns the state for one run and sequences the steps: generate the next
//! collateral price, run the update engine, append the result. Steps are
//! numbered from 1 and strictly sequential.

use crate::engine::{self, StepOutcome, PRICE_CEILING};
use crate::error::ConfigError;
use crate::params::SimulationConfig;
use crate::price::{ExogenousPrice, PriceProcess};
use crate::state::SimulationState;

/// Aggregates of a finished (or partial) run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub final_collateral_price: f64,
    pub final_token_price: f64,
    pub final_token_supply: f64,
    pub final_vault_issuance: f64,
    pub final_base_fee: f64,
    pub min_token_price: f64,
    pub max_token_price: f64,
    pub max_base_fee: f64,
    pub total_redeemed: f64,
    pub redemption_steps: usize,
    pub ceiling_hits: usize,
}

impl RunSummary {
    /// Summarize a state. Extremes cover the stepped entries only; a state
    /// with no steps yet falls back to the seed.
    ///
    /// `ceiling_hits` is recovered from prices pinned at exactly the ceiling,
    /// which also counts a raw clearing price of exactly 1.1 that the engine
    /// left alone. `Simulation::summary` reports the exact count.
    pub fn from_state(state: &SimulationState) -> Self {
        let last = state.last();
        // index 0 is the seed, not a simulated step
        let first = if state.steps() > 0 { 1 } else { 0 };
        let prices = &state.token_price()[first..];
        let fees = &state.base_fee()[first..];
        let redeemed = &state.redeemed_amount()[1..];

        Self {
            steps: state.steps(),
            final_collateral_price: last.collateral_price,
            final_token_price: last.token_price,
            final_token_supply: last.token_supply,
            final_vault_issuance: last.vault_issuance,
            final_base_fee: last.base_fee,
            min_token_price: prices.iter().cloned().fold(f64::INFINITY, f64::min),
            max_token_price: prices.iter().cloned().fold(0.0, f64::max),
            max_base_fee: fees.iter().cloned().fold(0.0, f64::max),
            total_redeemed: redeemed.iter().sum(),
            redemption_steps: redeemed.iter().filter(|&&r| r > 0.0).count(),
            ceiling_hits: state.token_price()[1..]
                .iter()
                .filter(|&&p| p == PRICE_CEILING)
                .count(),
        }
    }
}

pub struct Simulation<P: PriceProcess = ExogenousPrice> {
    config: SimulationConfig,
    prices: P,
    state: SimulationState,
    ceiling_hits: usize,
}

impl Simulation<ExogenousPrice> {
    /// Validate `config` and set up the run. Nothing is stepped yet.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let prices = ExogenousPrice::new(config.price_generator, config.seed);
        Self::with_process(config, prices)
    }
}

impl<P: PriceProcess> Simulation<P> {
    /// Run with a caller-supplied price process instead of the configured generator.
    pub fn with_process(config: SimulationConfig, prices: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SimulationState::with_capacity(&config.initial, config.steps);

        Ok(Self {
            config,
            prices,
            state,
            ceiling_hits: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn into_state(self) -> SimulationState {
        self.state
    }

    /// Steps executed so far.
    pub fn current_step(&self) -> usize {
        self.state.steps()
    }

    pub fn is_finished(&self) -> bool {
        self.current_step() >= self.config.steps
    }

    /// Advance one step, returning what it produced.
    pub fn step(&mut self) -> StepOutcome {
        let step = self.current_step() + 1;
        let collateral_price = self
            .prices
            .next_price(self.state.collateral_price(), step);
        let outcome = engine::step(&self.state, &self.config.params, collateral_price);

        if let Some(excess) = outcome.ceiling_excess {
            self.ceiling_hits += 1;
            log::debug!(
                "step {}: price ceiling {} hit, excess issuance {:.4}",
                step,
                PRICE_CEILING,
                excess
            );
        }
        log::trace!("step {}: {:?}", step, outcome.values);

        self.state.push(outcome.values);
        outcome
    }

    /// Run the remaining steps up to the configured count.
    pub fn run(&mut self) -> RunSummary {
        log::info!(
            "running {} steps with {} price process ({})",
            self.config.steps,
            self.config.price_generator.name(),
            self.config.params.describe()
        );

        while !self.is_finished() {
            self.step();
        }

        let summary = self.summary();
        log::info!(
            "finished {} steps: token price {:.4}, supply {:.2}, {} ceiling hits",
            summary.steps,
            summary.final_token_price,
            summary.final_token_supply,
            summary.ceiling_hits
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ceiling_hits: self.ceiling_hits,
            ..RunSummary::from_state(&self.state)
        }
    }
}

/// Validate, run to completion and hand back the state with its summary.
pub fn run_simulation(
    config: SimulationConfig,
) -> Result<(SimulationState, RunSummary), ConfigError> {
    let mut sim = Simulation::new(config)?;
    let summary = sim.run();
    Ok((sim.into_state(), summary))
}
