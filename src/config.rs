//! Engine configuration.
//!
//! Defaults match the standard game timings. Any value can be overridden
//! from the environment:
//! - `HEXFRONT_TICK_MS` - resolution interval per match (default: 5000)
//! - `HEXFRONT_WAKE_MS` - scheduler wake interval (default: 100)
//! - `HEXFRONT_JOIN_TIMEOUT_SECS` - unstarted match lifetime (default: 600)
//! - `HEXFRONT_IDLE_TICKS` - idle ticks tolerated before eviction (default: 12)
//! - `HEXFRONT_FINISHED_GRACE_SECS` - retention after game over (default: 60)
//! - `HEXFRONT_SEED` - registry random seed, 0 for entropy (default: 0)

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised while reading configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Timing and limits for the match registry and tick scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Interval between resolutions of a started match.
    pub tick_interval: Duration,
    /// How often the scheduler wakes to look for due matches.
    pub scheduler_wake: Duration,
    /// How long an unstarted match waits for its challenger.
    pub join_timeout: Duration,
    /// A match is evicted once its consecutive idle ticks exceed this.
    pub idle_tick_limit: u32,
    /// How long a finished match stays retrievable.
    pub finished_grace: Duration,
    /// Attempts at generating an unused match code before giving up.
    pub code_attempts: u32,
    /// Random seed (0 = use entropy).
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tick_interval: Duration::from_secs(5),
            scheduler_wake: Duration::from_millis(100),
            join_timeout: Duration::from_secs(600),
            idle_tick_limit: 12,
            finished_grace: Duration::from_secs(60),
            code_attempts: 64,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from defaults plus overrides supplied by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = read::<u64>(&lookup, "HEXFRONT_TICK_MS")? {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = read::<u64>(&lookup, "HEXFRONT_WAKE_MS")? {
            config.scheduler_wake = Duration::from_millis(ms.max(1));
        }
        if let Some(secs) = read::<u64>(&lookup, "HEXFRONT_JOIN_TIMEOUT_SECS")? {
            config.join_timeout = Duration::from_secs(secs);
        }
        if let Some(ticks) = read::<u32>(&lookup, "HEXFRONT_IDLE_TICKS")? {
            config.idle_tick_limit = ticks;
        }
        if let Some(secs) = read::<u64>(&lookup, "HEXFRONT_FINISHED_GRACE_SECS")? {
            config.finished_grace = Duration::from_secs(secs);
        }
        if let Some(seed) = read::<u64>(&lookup, "HEXFRONT_SEED")? {
            config.seed = seed;
        }

        Ok(config)
    }
}

fn read<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}
