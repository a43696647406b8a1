// Body temperature: latest reading or a fallback. Never fails.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use crate::config::{FallbackMode, TemperatureConfig};
use crate::models::{MetricResult, RawPoint};

/// Value used when there is no usable reading.
pub enum TemperatureFallback {
    Fixed(f64),
    /// Uniform draw from `range`, rounded to 0.1 °C.
    Random {
        range: RangeInclusive<f64>,
        rng: Mutex<StdRng>,
    },
}

impl TemperatureFallback {
    pub fn random(range: RangeInclusive<f64>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        TemperatureFallback::Random {
            range,
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(config: &TemperatureConfig) -> Self {
        match config.fallback {
            FallbackMode::Fixed => TemperatureFallback::Fixed(config.fixed_value),
            FallbackMode::Random => {
                Self::random(config.random_min..=config.random_max, config.seed)
            }
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            TemperatureFallback::Fixed(v) => *v,
            TemperatureFallback::Random { range, rng } => {
                if range.start() >= range.end() {
                    return *range.start();
                }
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                let v = rng.gen_range(range.clone());
                ((v * 10.0).round() / 10.0).clamp(*range.start(), *range.end())
            }
        }
    }
}

pub struct TemperatureReducer {
    fallback: TemperatureFallback,
    plausible: RangeInclusive<f64>,
}

impl TemperatureReducer {
    pub fn new(fallback: TemperatureFallback, plausible: RangeInclusive<f64>) -> Self {
        Self {
            fallback,
            plausible,
        }
    }

    pub fn from_config(config: &TemperatureConfig) -> Self {
        Self::new(
            TemperatureFallback::from_config(config),
            config.plausible_min..=config.plausible_max,
        )
    }

    /// First point's reading if it is a plausible number, else the fallback.
    pub fn summarize(&self, points: &[RawPoint]) -> MetricResult {
        let reading = points
            .first()
            .and_then(|p| p.first_value().as_f64())
            .filter(|v| self.plausible.contains(v));
        match reading {
            Some(v) => MetricResult::Scalar(v),
            None => MetricResult::Scalar(self.fallback.value()),
        }
    }
}
