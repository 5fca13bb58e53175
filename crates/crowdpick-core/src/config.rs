//! Runtime configuration read from the environment.
//!
//! | key | default |
//! |---|---|
//! | `CROWDPICK_DEFAULT_N_ANSWERS` | 30 |
//! | `CROWDPICK_CACHE_CAPACITY` | 1024 |
//! | `CROWDPICK_CACHE_SHORT_SECS` | 300 |
//! | `CROWDPICK_CACHE_MEDIUM_SECS` | 3600 |
//! | `CROWDPICK_CACHE_LONG_SECS` | 86400 |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_N_ANSWERS;

pub const DEFAULT_N_ANSWERS_KEY: &str = "CROWDPICK_DEFAULT_N_ANSWERS";
pub const CACHE_CAPACITY_KEY: &str = "CROWDPICK_CACHE_CAPACITY";
pub const CACHE_SHORT_SECS_KEY: &str = "CROWDPICK_CACHE_SHORT_SECS";
pub const CACHE_MEDIUM_SECS_KEY: &str = "CROWDPICK_CACHE_MEDIUM_SECS";
pub const CACHE_LONG_SECS_KEY: &str = "CROWDPICK_CACHE_LONG_SECS";

const FIVE_MINUTES: u64 = 5 * 60;
const ONE_HOUR: u64 = 60 * 60;
const ONE_DAY: u64 = 24 * ONE_HOUR;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Answer quota for tasks without their own `n_answers`.
    pub default_n_answers: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_n_answers: DEFAULT_N_ANSWERS,
        }
    }
}

/// Freshness windows and size of the user statistics cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    pub short: Duration,
    pub medium: Duration,
    pub long: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            short: Duration::from_secs(FIVE_MINUTES),
            medium: Duration::from_secs(ONE_HOUR),
            long: Duration::from_secs(ONE_DAY),
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from any key lookup. Unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let scheduler_defaults = SchedulerConfig::default();
        let cache_defaults = CacheConfig::default();

        Ok(Self {
            scheduler: SchedulerConfig {
                default_n_answers: parse_or(
                    DEFAULT_N_ANSWERS_KEY,
                    get(DEFAULT_N_ANSWERS_KEY),
                    scheduler_defaults.default_n_answers,
                )?,
            },
            cache: CacheConfig {
                capacity: positive(
                    CACHE_CAPACITY_KEY,
                    parse_or(
                        CACHE_CAPACITY_KEY,
                        get(CACHE_CAPACITY_KEY),
                        cache_defaults.capacity,
                    )?,
                )?,
                short: secs_or(CACHE_SHORT_SECS_KEY, get(CACHE_SHORT_SECS_KEY), cache_defaults.short)?,
                medium: secs_or(
                    CACHE_MEDIUM_SECS_KEY,
                    get(CACHE_MEDIUM_SECS_KEY),
                    cache_defaults.medium,
                )?,
                long: secs_or(CACHE_LONG_SECS_KEY, get(CACHE_LONG_SECS_KEY), cache_defaults.long)?,
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn secs_or(key: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    parse_or(key, raw, default.as_secs()).map(Duration::from_secs)
}

fn positive(key: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
