//! Update Engine
//!
//! Pure step function for the stabilized token. Given the state so far, the
//! parameters and a freshly generated collateral price, each stage reads only
//! prior-step values or stages already computed in the same step:
//!
//! 1. Momentum of the collateral price over the lookback window
//! 2. Redemption, active while the token trades below `1 - base fee`
//! 3. Base fee decay, pushed up by redemption pressure
//! 4. Token demand (constant pass-through)
//! 5. Clearing price from the quantity theory of money
//! 6. Vault issuance, procyclical in price and momentum
//! 7. Token supply
//! 8. Price ceiling correction at 1.1 via excess issuance
//!
//! Nothing here fails. Values that would leave their valid range are
//! clamped in place.

use crate::params::Parameters;
use crate::state::{SimulationState, StepValues};

/// Hard upper bound on the token price.
pub const PRICE_CEILING: f64 = 1.1;

/// Everything one step produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub values: StepValues,
    /// Issuance injected to hold the price at the ceiling, if it was hit.
    pub ceiling_excess: Option<f64>,
}

/// Relative change of `new_price` against the price `lookback` steps back.
///
/// A window reaching past the seed uses the earliest price; a zero past
/// price is treated as 1.
pub fn momentum(history: &[f64], lookback: usize, new_price: f64) -> f64 {
    if lookback == 0 {
        return 0.0;
    }

    let past = history
        .len()
        .checked_sub(lookback + 1)
        .and_then(|i| history.get(i))
        .or_else(|| history.first())
        .copied()
        .unwrap_or(0.0);
    let past = if past == 0.0 { 1.0 } else { past };

    (new_price - past) / past
}

pub fn redeemed_amount(
    last_supply: f64,
    last_token_price: f64,
    last_base_fee: f64,
    max_redemption_fraction: f64,
) -> f64 {
    let max_redeemable = last_supply * max_redemption_fraction;
    if max_redeemable == 0.0 {
        return 0.0;
    }

    let raw = (1.0 - last_token_price - last_base_fee) * last_supply;
    if raw < 0.0 {
        0.0
    } else {
        raw.min(max_redeemable)
    }
}

pub fn base_fee(last_fee: f64, last_supply: f64, redeemed: f64, fee_decay: f64) -> f64 {
    if last_supply == 0.0 {
        return 0.0;
    }
    (last_fee + redeemed / (2.0 * last_supply)) * fee_decay
}

/// Demand for holding the token. Constant for now; negative demand floors at 0.
pub fn token_demand(current_demand: f64) -> f64 {
    current_demand.max(0.0)
}

/// Market-clearing token price.
///
/// A zero last issuance is treated as 1, mirroring the momentum rule.
pub fn clearing_price(
    demand: f64,
    redeemed: f64,
    last_vault_issuance: f64,
    momentum: f64,
    params: &Parameters,
) -> f64 {
    let issuance = if last_vault_issuance == 0.0 {
        1.0
    } else {
        last_vault_issuance
    };
    let factor = 1.0 / params.price_weight;
    let price = ((demand - redeemed) / issuance - params.momentum_weight * momentum) * factor;
    price.max(0.0)
}

pub fn vault_issuance(
    last_vault_issuance: f64,
    token_price: f64,
    momentum: f64,
    params: &Parameters,
) -> f64 {
    let issuance = last_vault_issuance
        * (params.price_weight * token_price + params.momentum_weight * momentum);
    issuance.max(0.0)
}

pub fn token_supply(vault_issuance: f64, redeemed: f64) -> f64 {
    (vault_issuance - redeemed).max(0.0)
}

/// Issuance needed to hold `token_price` at the ceiling, or `None` below it.
pub fn excess_issuance(token_price: f64, token_supply: f64) -> Option<f64> {
    if token_price > PRICE_CEILING {
        Some(token_supply * (token_price - PRICE_CEILING) / PRICE_CEILING)
    } else {
        None
    }
}

/// Clamp `values` to the ceiling, adding excess issuance when it is hit.
///
/// Supply is re-derived from issuance alone on this path; redemption is not
/// subtracted a second time.
pub fn apply_price_ceiling(values: &mut StepValues) -> Option<f64> {
    let excess = excess_issuance(values.token_price, values.token_supply)?;
    values.token_price = PRICE_CEILING;
    values.vault_issuance += excess;
    values.token_supply = token_supply(values.vault_issuance, 0.0);
    Some(excess)
}

/// Run one full update against the latest entries of `state`.
pub fn step(state: &SimulationState, params: &Parameters, collateral_price: f64) -> StepOutcome {
    let last = state.last();

    let momentum = momentum(state.collateral_price(), params.lookback, collateral_price);
    let redeemed = redeemed_amount(
        last.token_supply,
        last.token_price,
        last.base_fee,
        params.max_redemption_fraction,
    );
    let base_fee = base_fee(last.base_fee, last.token_supply, redeemed, params.fee_decay);
    let demand = token_demand(last.token_demand);

    // clear the market
    let token_price = clearing_price(demand, redeemed, last.vault_issuance, momentum, params);
    let vault_issuance = vault_issuance(last.vault_issuance, token_price, momentum, params);
    let token_supply = token_supply(vault_issuance, redeemed);

    let mut values = StepValues {
        collateral_price,
        momentum,
        base_fee,
        redeemed_amount: redeemed,
        token_price,
        vault_issuance,
        token_supply,
        token_demand: demand,
    };
    let ceiling_excess = apply_price_ceiling(&mut values);

    StepOutcome {
        values,
        ceiling_excess,
    }
}
