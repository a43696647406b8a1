use serde::Deserialize;

use crate::provider::{DEFAULT_BASE_URL, SLEEP_ACTIVITY_TYPE};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub windows: WindowsConfig,
    #[serde(default)]
    pub temperature: TemperatureConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

/// Where sleep comes from: segment points (stage codes) or sleep sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepSource {
    Segments,
    Sessions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub heart_rate_source: String,
    pub steps_source: String,
    pub oxygen_source: String,
    pub temperature_source: String,
    pub sleep_source: String,
    pub activity_source: String,
    pub sleep_mode: SleepSource,
    /// Activity type of sleep sessions (sessions mode only).
    pub sleep_activity_type: i64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: 10,
            heart_rate_source:
                "derived:com.google.heart_rate.bpm:com.google.android.gms:merge_heart_rate_bpm"
                    .into(),
            steps_source:
                "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps".into(),
            oxygen_source:
                "derived:com.google.oxygen_saturation:com.google.android.gms:merge_oxygen_saturation"
                    .into(),
            temperature_source:
                "derived:com.google.body.temperature:com.google.android.gms:merge_body_temperature"
                    .into(),
            sleep_source: "derived:com.google.sleep.segment:com.google.android.gms:merged".into(),
            activity_source:
                "derived:com.google.activity.segment:com.google.android.gms:merge_activity_segments"
                    .into(),
            sleep_mode: SleepSource::Segments,
            sleep_activity_type: SLEEP_ACTIVITY_TYPE,
        }
    }
}

/// Upper bounds for lookbacks: one year of hours, ten years of sleep days.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;
pub const MAX_SLEEP_DAYS: u32 = 3650;

/// Lookback per metric.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub heart_rate_hours: u32,
    pub steps_hours: u32,
    pub oxygen_hours: u32,
    pub temperature_hours: u32,
    pub activity_hours: u32,
    pub sleep_days: u32,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            heart_rate_hours: 24,
            steps_hours: 24,
            oxygen_hours: 24,
            temperature_hours: 24,
            activity_hours: 24,
            sleep_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    Fixed,
    Random,
}

/// Body temperature fallback, in °C.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    pub fallback: FallbackMode,
    pub fixed_value: f64,
    pub random_min: f64,
    pub random_max: f64,
    /// Seed for the random fallback; unset = seeded from entropy.
    pub seed: Option<u64>,
    /// Readings outside [plausible_min, plausible_max] are replaced by the fallback.
    pub plausible_min: f64,
    pub plausible_max: f64,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackMode::Random,
            fixed_value: 36.6,
            random_min: 36.1,
            random_max: 37.2,
            seed: None,
            plausible_min: 30.0,
            plausible_max: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any non-temperature failure aborts the request.
    FailFast,
    /// Failed metrics become null; only all-failed aborts.
    Partial,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub policy: FailurePolicy,
    pub timeout_secs: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::FailFast,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            !self.provider.base_url.is_empty(),
            "provider.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.provider.request_timeout_secs > 0,
            "provider.request_timeout_secs must be > 0, got {}",
            self.provider.request_timeout_secs
        );
        for (name, id) in [
            ("provider.heart_rate_source", &self.provider.heart_rate_source),
            ("provider.steps_source", &self.provider.steps_source),
            ("provider.oxygen_source", &self.provider.oxygen_source),
            ("provider.temperature_source", &self.provider.temperature_source),
            ("provider.sleep_source", &self.provider.sleep_source),
            ("provider.activity_source", &self.provider.activity_source),
        ] {
            anyhow::ensure!(!id.is_empty(), "{} must be non-empty", name);
        }
        for (name, v, max) in [
            ("windows.heart_rate_hours", self.windows.heart_rate_hours, MAX_WINDOW_HOURS),
            ("windows.steps_hours", self.windows.steps_hours, MAX_WINDOW_HOURS),
            ("windows.oxygen_hours", self.windows.oxygen_hours, MAX_WINDOW_HOURS),
            ("windows.temperature_hours", self.windows.temperature_hours, MAX_WINDOW_HOURS),
            ("windows.activity_hours", self.windows.activity_hours, MAX_WINDOW_HOURS),
            ("windows.sleep_days", self.windows.sleep_days, MAX_SLEEP_DAYS),
        ] {
            anyhow::ensure!(
                v > 0 && v <= max,
                "{} must be between 1 and {}, got {}",
                name,
                max,
                v
            );
        }
        let t = &self.temperature;
        anyhow::ensure!(
            t.plausible_min.is_finite() && t.plausible_max.is_finite() && t.plausible_min < t.plausible_max,
            "temperature.plausible_min must be < temperature.plausible_max, got {}..{}",
            t.plausible_min,
            t.plausible_max
        );
        anyhow::ensure!(
            t.fixed_value.is_finite(),
            "temperature.fixed_value must be finite"
        );
        anyhow::ensure!(
            t.random_min.is_finite() && t.random_max.is_finite() && t.random_min <= t.random_max,
            "temperature.random_min must be <= temperature.random_max, got {}..{}",
            t.random_min,
            t.random_max
        );
        anyhow::ensure!(
            self.aggregation.timeout_secs > 0,
            "aggregation.timeout_secs must be > 0, got {}",
            self.aggregation.timeout_secs
        );
        Ok(())
    }
}
