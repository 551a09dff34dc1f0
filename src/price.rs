//! Exogenous Collateral Price Processes
//!
//! Generates the external collateral price fed into each step. Exactly one
//! generator is active per run, chosen in the configuration.
//!
//! ## Generators
//! - Constant: last price unchanged
//! - Random walk: Gaussian noise with occasional fat-tailed jumps
//! - Linear increasing / decreasing
//! - Oscillating, quadratic, one-over-i, sublinear

use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Anything that can produce the next collateral price.
pub trait PriceProcess {
    /// `history` holds every price so far (never empty); `step` starts at 1.
    fn next_price(&mut self, history: &[f64], step: usize) -> f64;
}

/// Largest collateral price a configured run may reach.
pub const MAX_COLLATERAL_PRICE: f64 = 1e12;

fn default_noise_scale() -> f64 {
    5.0
}

fn default_jump_threshold() -> f64 {
    1.5
}

fn default_jump_scale() -> f64 {
    20.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceGenerator {
    Constant,
    RandomWalk {
        #[serde(default = "default_noise_scale")]
        noise_scale: f64,
        #[serde(default = "default_jump_threshold")]
        jump_threshold: f64,
        #[serde(default = "default_jump_scale")]
        jump_scale: f64,
    },
    LinearIncreasing {
        gradient: f64,
    },
    LinearDecreasing {
        start: f64,
        gradient: f64,
    },
    Oscillating {
        min: f64,
        magnitude: f64,
    },
    Quadratic {
        min: f64,
        scale: f64,
    },
    OneOverI {
        scale: f64,
    },
    Sublinear {
        steepness: f64,
    },
}

impl Default for PriceGenerator {
    fn default() -> Self {
        Self::random_walk()
    }
}

impl PriceGenerator {
    pub fn random_walk() -> Self {
        Self::RandomWalk {
            noise_scale: default_noise_scale(),
            jump_threshold: default_jump_threshold(),
            jump_scale: default_jump_scale(),
        }
    }

    /// Every generator with the argument sets of the reference model run.
    pub fn all_presets() -> Vec<Self> {
        vec![
            Self::Constant,
            Self::random_walk(),
            Self::Oscillating {
                min: 500.0,
                magnitude: 100.0,
            },
            Self::Quadratic {
                min: 500.0,
                scale: 10.0,
            },
            Self::LinearIncreasing { gradient: 3.0 },
            Self::LinearDecreasing {
                start: 800.0,
                gradient: 1.0,
            },
            Self::OneOverI { scale: 1000.0 },
            Self::Sublinear { steepness: 10.0 },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::RandomWalk { .. } => "Random Walk (jumps)",
            Self::LinearIncreasing { .. } => "Linear Increasing",
            Self::LinearDecreasing { .. } => "Linear Decreasing",
            Self::Oscillating { .. } => "Oscillating",
            Self::Quadratic { .. } => "Quadratic",
            Self::OneOverI { .. } => "One Over i",
            Self::Sublinear { .. } => "Sublinear",
        }
    }

    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::RandomWalk { .. })
    }

    /// Largest price magnitude the generator can reach within `steps` steps
    /// from `start_price`. The random walk uses an 8-sigma bound per step.
    pub fn reach(&self, start_price: f64, steps: usize) -> f64 {
        let n = steps as f64;
        let start = start_price.abs();
        match *self {
            Self::Constant => start,
            Self::RandomWalk {
                noise_scale,
                jump_scale,
                ..
            } => start + n * 8.0 * (noise_scale.abs() + jump_scale.abs()),
            Self::LinearIncreasing { gradient } => start + n * gradient.abs(),
            Self::LinearDecreasing { start, gradient } => start.abs() + n * gradient.abs(),
            Self::Oscillating { min, magnitude } => min.abs() + 2.0 * magnitude.abs(),
            Self::Quadratic { min, scale } => min.abs() + scale.abs() * n * n,
            Self::OneOverI { scale } => scale.abs(),
            Self::Sublinear { steepness } => start + n / (2.0 * steepness.sqrt()),
        }
    }

    /// Reject non-finite arguments and arguments that would turn the price
    /// series into NaN. Growth over a run is checked with [`Self::reach`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name();
        let args: Vec<(&str, f64)> = match *self {
            Self::Constant => Vec::new(),
            Self::RandomWalk {
                noise_scale,
                jump_threshold,
                jump_scale,
            } => {
                if noise_scale < 0.0 {
                    return Err(ConfigError::generator(name, "noise_scale must be non-negative"));
                }
                vec![
                    ("noise_scale", noise_scale),
                    ("jump_threshold", jump_threshold),
                    ("jump_scale", jump_scale),
                ]
            }
            Self::LinearIncreasing { gradient } => vec![("gradient", gradient)],
            Self::LinearDecreasing { start, gradient } => {
                vec![("start", start), ("gradient", gradient)]
            }
            Self::Oscillating { min, magnitude } => vec![("min", min), ("magnitude", magnitude)],
            Self::Quadratic { min, scale } => vec![("min", min), ("scale", scale)],
            Self::OneOverI { scale } => vec![("scale", scale)],
            Self::Sublinear { steepness } => {
                if steepness.is_nan() || steepness <= 0.0 {
                    return Err(ConfigError::generator(
                        name,
                        format!("steepness must be positive, got {}", steepness),
                    ));
                }
                vec![("steepness", steepness)]
            }
        };

        for (arg, value) in args {
            if !value.is_finite() {
                return Err(ConfigError::generator(
                    name,
                    format!("{} must be finite, got {}", arg, value),
                ));
            }
        }
        Ok(())
    }
}

/// A configured generator together with its random source.
pub struct ExogenousPrice {
    generator: PriceGenerator,
    rng: StdRng,
}

impl ExogenousPrice {
    /// A fixed seed makes the random walk reproducible; `None` draws from entropy.
    pub fn new(generator: PriceGenerator, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { generator, rng }
    }
}

impl PriceProcess for ExogenousPrice {
    fn next_price(&mut self, history: &[f64], step: usize) -> f64 {
        let last_price = history.last().copied().unwrap_or(0.0);
        let i = step as f64;

        match self.generator {
            PriceGenerator::Constant => last_price,

            PriceGenerator::RandomWalk {
                noise_scale,
                jump_threshold,
                jump_scale,
            } => {
                let standard = Normal::new(0.0, 1.0).unwrap();
                let big_event_chance: f64 = standard.sample(&mut self.rng);
                let big_event = if big_event_chance.abs() > jump_threshold {
                    big_event_chance * jump_scale
                } else {
                    0.0
                };

                // noise_scale is checked non-negative during validation
                let noise: f64 = standard.sample(&mut self.rng) * noise_scale;
                (last_price + noise + big_event).max(0.0)
            }

            PriceGenerator::LinearIncreasing { gradient } => last_price + gradient,

            PriceGenerator::LinearDecreasing { start, gradient } => (start - gradient * i).max(0.0),

            PriceGenerator::Oscillating { min, magnitude } => min + magnitude + magnitude * i.sin(),

            PriceGenerator::Quadratic { min, scale } => min + scale * i.powi(2),

            // step 0 never reaches a generator, the driver numbers steps from 1
            PriceGenerator::OneOverI { scale } => scale / i,

            PriceGenerator::Sublinear { steepness } => {
                last_price + 1.0 / (2.0 * (steepness * (i + 1.0)).sqrt())
            }
        }
    }
}
