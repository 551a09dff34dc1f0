//! Simulation State
//!
//! Seven aligned time series (one entry per executed step plus the seed)
//! and the token demand scalar, which is overwritten rather than recorded.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Starting point of a run: the single seed entry of every series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedState {
    pub collateral_price: f64,
    pub momentum: f64,
    pub base_fee: f64,
    pub redeemed_amount: f64,
    pub token_price: f64,
    pub vault_issuance: f64,
    pub token_supply: f64,
    pub token_demand: f64,
}

impl Default for SeedState {
    fn default() -> Self {
        Self {
            collateral_price: 500.0,
            momentum: 0.0,
            base_fee: 0.0,
            redeemed_amount: 0.0,
            token_price: 1.0,
            vault_issuance: 100.0,
            token_supply: 100.0,
            token_demand: 100.0,
        }
    }
}

impl SeedState {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("collateral_price", self.collateral_price),
            ("base_fee", self.base_fee),
            ("redeemed_amount", self.redeemed_amount),
            ("token_price", self.token_price),
            ("vault_issuance", self.vault_issuance),
            ("token_supply", self.token_supply),
            ("token_demand", self.token_demand),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::seed_state(
                    field,
                    format!("must be a finite non-negative number, got {}", value),
                ));
            }
        }
        if !self.momentum.is_finite() {
            return Err(ConfigError::seed_state("momentum", "must be finite"));
        }
        if self.vault_issuance == 0.0 {
            return Err(ConfigError::seed_state(
                "vault_issuance",
                "must be positive, the clearing price divides by it",
            ));
        }
        Ok(())
    }
}

/// Values produced by one step, appended to every series at once.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepValues {
    pub collateral_price: f64,
    pub momentum: f64,
    pub base_fee: f64,
    pub redeemed_amount: f64,
    pub token_price: f64,
    pub vault_issuance: f64,
    pub token_supply: f64,
    pub token_demand: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationState {
    collateral_price: Vec<f64>,
    momentum: Vec<f64>,
    base_fee: Vec<f64>,
    redeemed_amount: Vec<f64>,
    token_price: Vec<f64>,
    vault_issuance: Vec<f64>,
    token_supply: Vec<f64>,
    token_demand: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&SeedState::default())
    }
}

impl SimulationState {
    pub fn new(seed: &SeedState) -> Self {
        Self {
            collateral_price: vec![seed.collateral_price],
            momentum: vec![seed.momentum],
            base_fee: vec![seed.base_fee],
            redeemed_amount: vec![seed.redeemed_amount],
            token_price: vec![seed.token_price],
            vault_issuance: vec![seed.vault_issuance],
            token_supply: vec![seed.token_supply],
            token_demand: seed.token_demand,
        }
    }

    /// Reserve room for `steps` more entries in every series.
    pub fn with_capacity(seed: &SeedState, steps: usize) -> Self {
        let mut state = Self::new(seed);
        for series in state.series_mut() {
            series.reserve(steps);
        }
        state
    }

    /// Append one step. The only way the series grow, so they stay aligned.
    pub fn push(&mut self, values: StepValues) {
        self.collateral_price.push(values.collateral_price);
        self.momentum.push(values.momentum);
        self.base_fee.push(values.base_fee);
        self.redeemed_amount.push(values.redeemed_amount);
        self.token_price.push(values.token_price);
        self.vault_issuance.push(values.vault_issuance);
        self.token_supply.push(values.token_supply);
        self.token_demand = values.token_demand;
    }

    /// Number of entries in each series (steps executed + 1).
    pub fn len(&self) -> usize {
        self.collateral_price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collateral_price.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.len() - 1
    }

    /// Values as of step `i` (0 is the seed).
    pub fn at(&self, i: usize) -> Option<StepValues> {
        if i >= self.len() {
            return None;
        }
        Some(StepValues {
            collateral_price: self.collateral_price[i],
            momentum: self.momentum[i],
            base_fee: self.base_fee[i],
            redeemed_amount: self.redeemed_amount[i],
            token_price: self.token_price[i],
            vault_issuance: self.vault_issuance[i],
            token_supply: self.token_supply[i],
            token_demand: self.token_demand,
        })
    }

    /// Latest entry of every series. Demand is the current scalar.
    pub fn last(&self) -> StepValues {
        let i = self.len() - 1;
        StepValues {
            collateral_price: self.collateral_price[i],
            momentum: self.momentum[i],
            base_fee: self.base_fee[i],
            redeemed_amount: self.redeemed_amount[i],
            token_price: self.token_price[i],
            vault_issuance: self.vault_issuance[i],
            token_supply: self.token_supply[i],
            token_demand: self.token_demand,
        }
    }

    pub fn collateral_price(&self) -> &[f64] {
        &self.collateral_price
    }

    pub fn momentum(&self) -> &[f64] {
        &self.momentum
    }

    pub fn base_fee(&self) -> &[f64] {
        &self.base_fee
    }

    pub fn redeemed_amount(&self) -> &[f64] {
        &self.redeemed_amount
    }

    pub fn token_price(&self) -> &[f64] {
        &self.token_price
    }

    pub fn vault_issuance(&self) -> &[f64] {
        &self.vault_issuance
    }

    pub fn token_supply(&self) -> &[f64] {
        &self.token_supply
    }

    pub fn token_demand(&self) -> f64 {
        self.token_demand
    }

    fn series_mut(&mut self) -> [&mut Vec<f64>; 7] {
        [
            &mut self.collateral_price,
            &mut self.momentum,
            &mut self.base_fee,
            &mut self.redeemed_amount,
            &mut self.token_price,
            &mut self.vault_issuance,
            &mut self.token_supply,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(price: f64) -> StepValues {
        StepValues {
            collateral_price: price,
            momentum: 0.1,
            base_fee: 0.01,
            redeemed_amount: 2.0,
            token_price: 0.98,
            vault_issuance: 101.0,
            token_supply: 99.0,
            token_demand: 90.0,
        }
    }

    #[test]
    fn test_seed_state_defaults() {
        let state = SimulationState::default();

        assert_eq!(state.len(), 1);
        assert_eq!(state.steps(), 0);
        assert_eq!(state.collateral_price(), &[500.0]);
        assert_eq!(state.token_price(), &[1.0]);
        assert_eq!(state.vault_issuance(), &[100.0]);
        assert_eq!(state.token_supply(), &[100.0]);
        assert_eq!(state.token_demand(), 100.0);
    }

    #[test]
    fn test_push_keeps_series_aligned() {
        let mut state = SimulationState::with_capacity(&SeedState::default(), 3);
        state.push(values(510.0));
        state.push(values(520.0));

        assert_eq!(state.len(), 3);
        for series in [
            state.collateral_price(),
            state.momentum(),
            state.base_fee(),
            state.redeemed_amount(),
            state.token_price(),
            state.vault_issuance(),
            state.token_supply(),
        ] {
            assert_eq!(series.len(), 3);
        }
        assert_eq!(state.last().collateral_price, 520.0);
        assert_eq!(state.token_demand(), 90.0);
        assert_eq!(state.at(1).map(|v| v.collateral_price), Some(510.0));
        assert!(state.at(3).is_none());
    }

    #[test]
    fn test_seed_state_rejects_zero_issuance() {
        let seed = SeedState {
            vault_issuance: 0.0,
            ..SeedState::default()
        };
        assert!(matches!(
            seed.validate(),
            Err(ConfigError::InvalidSeedState { field: "vault_issuance", .. })
        ));
    }

    #[test]
    fn test_seed_state_rejects_negative_supply() {
        let seed = SeedState {
            token_supply: -1.0,
            ..SeedState::default()
        };
        assert!(seed.validate().is_err());
        assert!(SeedState::default().validate().is_ok());
    }
}
