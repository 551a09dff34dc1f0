//! Model Parameters and Run Configuration
//!
//! `Parameters` are fixed for one run. `SimulationConfig` adds the step
//! count, the price generator, the random seed and the seed state, and can
//! be loaded from JSON. The short model names (`D`, `T`, `F`, `N`) are
//! accepted as aliases.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::price::{PriceGenerator, MAX_COLLATERAL_PRICE};
use crate::state::SeedState;

pub const DEFAULT_STEPS: usize = 250;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Base fee decay factor applied each step (D)
    #[serde(alias = "D")]
    pub fee_decay: f64,
    /// Weight on token price in the clearing and issuance equations (T)
    #[serde(alias = "T")]
    pub price_weight: f64,
    /// Weight on momentum in the clearing and issuance equations (F)
    #[serde(alias = "F")]
    pub momentum_weight: f64,
    /// Steps back used for collateral price momentum
    pub lookback: usize,
    /// Cap on the fraction of supply redeemable in one step
    pub max_redemption_fraction: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            fee_decay: 0.5,
            price_weight: 1.0,
            momentum_weight: 0.3,
            lookback: 5,
            max_redemption_fraction: 1.0,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.price_weight.is_finite() || self.price_weight == 0.0 {
            return Err(ConfigError::parameter(
                "T",
                format!("must be finite and non-zero, got {}", self.price_weight),
            ));
        }
        if !(0.0..=1.0).contains(&self.fee_decay) {
            return Err(ConfigError::parameter(
                "D",
                format!("must lie in [0, 1], got {}", self.fee_decay),
            ));
        }
        if !self.momentum_weight.is_finite() {
            return Err(ConfigError::parameter("F", "must be finite"));
        }
        if !self.max_redemption_fraction.is_finite() || self.max_redemption_fraction < 0.0 {
            return Err(ConfigError::parameter(
                "max_redemption_fraction",
                format!(
                    "must be finite and non-negative, got {}",
                    self.max_redemption_fraction
                ),
            ));
        }
        Ok(())
    }

    /// One-line banner, e.g. `Parameters:  D=0.5  T=1  F=0.3  L=5  r_max=1`.
    pub fn describe(&self) -> String {
        format!(
            "Parameters:  D={}  T={}  F={}  L={}  r_max={}",
            self.fee_decay,
            self.price_weight,
            self.momentum_weight,
            self.lookback,
            self.max_redemption_fraction
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub params: Parameters,
    /// Number of steps to run (N)
    #[serde(alias = "N")]
    pub steps: usize,
    pub price_generator: PriceGenerator,
    /// Seed for the random walk. `None` draws from entropy.
    pub seed: Option<u64>,
    pub initial: SeedState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            params: Parameters::default(),
            steps: DEFAULT_STEPS,
            price_generator: PriceGenerator::default(),
            seed: None,
            initial: SeedState::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_generator(price_generator: PriceGenerator) -> Self {
        Self {
            price_generator,
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.steps == 0 {
            return Err(ConfigError::parameter("N", "must run at least one step"));
        }
        self.price_generator.validate()?;
        self.initial.validate()?;

        let reach = self
            .price_generator
            .reach(self.initial.collateral_price, self.steps);
        if reach.is_nan() || reach > MAX_COLLATERAL_PRICE {
            return Err(ConfigError::generator(
                self.price_generator.name(),
                format!(
                    "collateral price may reach {:e} within {} steps, limit is {:e}",
                    reach, self.steps, MAX_COLLATERAL_PRICE
                ),
            ));
        }
        Ok(())
    }
}
