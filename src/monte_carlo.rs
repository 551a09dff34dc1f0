//! Monte Carlo Stress Testing
//!
//! Repeats a run under many seeds of the random collateral process and
//! measures how far and how often the token leaves its peg.
//!
//! ## Metrics
//! - Minimum token price percentiles (5%, 1%)
//! - Expected shortfall of total redemption
//! - Depeg probability (token price below 0.99 at any step)
//! - Price ceiling frequency

use crate::driver::{RunSummary, Simulation};
use crate::error::ConfigError;
use crate::params::SimulationConfig;

pub const DEPEG_THRESHOLD: f64 = 0.99;

#[derive(Debug, Clone)]
pub struct MonteCarloResult {
    pub runs: usize,
    pub base_seed: u64,

    pub final_prices: Vec<f64>,
    pub min_prices: Vec<f64>,
    pub total_redemptions: Vec<f64>,
    pub ceiling_hits: Vec<usize>,

    pub mean_final_price: f64,
    pub mean_min_price: f64,
    pub worst_min_price: f64,
    pub min_price_p05: f64,
    pub min_price_p01: f64,
    pub mean_redeemed: f64,
    pub redemption_es_95: f64,
    pub depeg_probability: f64,
    pub ceiling_frequency: f64,
}

impl MonteCarloResult {
    pub fn print(&self) {
        println!("  Runs:                    {}", self.runs);
        println!("  Mean final price:        {:.4}", self.mean_final_price);
        println!("  Mean minimum price:      {:.4}", self.mean_min_price);
        println!("  Worst minimum price:     {:.4}", self.worst_min_price);
        println!("  Min price 5th pct:       {:.4}", self.min_price_p05);
        println!("  Min price 1st pct:       {:.4}", self.min_price_p01);
        println!("  Mean total redeemed:     {:.2}", self.mean_redeemed);
        println!("  Redemption ES 95%:       {:.2}", self.redemption_es_95);
        println!("  Depeg probability:       {:.2}%", self.depeg_probability * 100.0);
        println!("  Runs hitting ceiling:    {:.2}%", self.ceiling_frequency * 100.0);
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Mean of the upper tail beyond the `p` quantile.
fn expected_shortfall(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let cutoff_idx = ((sorted.len() as f64) * p).ceil() as usize;
    let tail = &sorted[cutoff_idx.min(sorted.len())..];
    if tail.is_empty() {
        return *sorted.last().unwrap_or(&0.0);
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Run `config` once per seed `base_seed..base_seed + runs`.
pub fn run_monte_carlo(
    config: &SimulationConfig,
    runs: usize,
    base_seed: u64,
) -> Result<MonteCarloResult, ConfigError> {
    config.validate()?;
    if runs == 0 {
        return Err(ConfigError::parameter("runs", "must be at least 1"));
    }
    if !config.price_generator.is_stochastic() {
        log::warn!(
            "{} price process is deterministic, every run will be identical",
            config.price_generator.name()
        );
    }

    let summaries = (0..runs as u64)
        .map(|i| {
            let run_config = SimulationConfig {
                seed: Some(base_seed.wrapping_add(i)),
                ..config.clone()
            };
            Simulation::new(run_config).map(|mut sim| sim.run())
        })
        .collect::<Result<Vec<RunSummary>, ConfigError>>()?;

    let n = runs as f64;
    let final_prices: Vec<f64> = summaries.iter().map(|s| s.final_token_price).collect();
    let min_prices: Vec<f64> = summaries.iter().map(|s| s.min_token_price).collect();
    let total_redemptions: Vec<f64> = summaries.iter().map(|s| s.total_redeemed).collect();
    let ceiling_hits: Vec<usize> = summaries.iter().map(|s| s.ceiling_hits).collect();

    let sorted_min_prices = sorted(&min_prices);
    let sorted_redemptions = sorted(&total_redemptions);

    Ok(MonteCarloResult {
        runs,
        base_seed,
        mean_final_price: final_prices.iter().sum::<f64>() / n,
        mean_min_price: min_prices.iter().sum::<f64>() / n,
        worst_min_price: sorted_min_prices[0],
        min_price_p05: percentile(&sorted_min_prices, 0.05),
        min_price_p01: percentile(&sorted_min_prices, 0.01),
        mean_redeemed: total_redemptions.iter().sum::<f64>() / n,
        redemption_es_95: expected_shortfall(&sorted_redemptions, 0.95),
        depeg_probability: min_prices.iter().filter(|&&p| p < DEPEG_THRESHOLD).count() as f64 / n,
        ceiling_frequency: ceiling_hits.iter().filter(|&&h| h > 0).count() as f64 / n,
        final_prices,
        min_prices,
        total_redemptions,
        ceiling_hits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> SimulationConfig {
        SimulationConfig {
            steps: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_monte_carlo_runs() {
        let result = run_monte_carlo(&short_config(), 20, 100).unwrap();

        assert_eq!(result.runs, 20);
        assert_eq!(result.final_prices.len(), 20);
        assert!(result.worst_min_price <= result.min_price_p05);
        assert!((0.0..=1.0).contains(&result.depeg_probability));
    }

    #[test]
    fn test_monte_carlo_reproducible() {
        let a = run_monte_carlo(&short_config(), 5, 7).unwrap();
        let b = run_monte_carlo(&short_config(), 5, 7).unwrap();
        assert_eq!(a.final_prices, b.final_prices);
        assert_eq!(a.total_redemptions, b.total_redemptions);
    }

    #[test]
    fn test_zero_runs_rejected() {
        assert!(run_monte_carlo(&short_config(), 0, 0).is_err());
    }

    #[test]
    fn test_percentile_and_shortfall() {
        let data: Vec<f64> = (0..100).map(|i| i as f64 * 100.0).collect();

        let p95 = percentile(&data, 0.95);
        assert!((9000.0..=9600.0).contains(&p95));

        // tail = last five entries: 9500..=9900
        assert_eq!(expected_shortfall(&data, 0.95), 9700.0);
    }
}
