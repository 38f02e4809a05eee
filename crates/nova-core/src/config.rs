//! Engine configuration
//!
//! Config is resolved in two layers:
//! 1. Optional TOML file: an explicit path, or the override in the data dir
//!    (~/.local/share/nova/config.toml) when present
//! 2. `NOVA_*` overrides from a caller-supplied variable lookup
//!
//! Anything not set keeps its built-in default. The core never reads the
//! process environment itself; the binary passes its lookup in.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Persistence key for the serialized state
pub const DEFAULT_STATE_KEY: &str = "novaState";

pub const ENV_DATA_DIR: &str = "NOVA_DATA_DIR";
pub const ENV_STATE_KEY: &str = "NOVA_STATE_KEY";
pub const ENV_INSIGHT_FAILURE_RATE: &str = "NOVA_INSIGHT_FAILURE_RATE";
pub const ENV_MIN_PAYMENT_RATE: &str = "NOVA_MIN_PAYMENT_RATE";
pub const ENV_EXTRA_PAYMENT: &str = "NOVA_EXTRA_PAYMENT";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Where the file backend keeps snapshots (None = platform default)
    pub data_dir: Option<PathBuf>,
    /// Persistence key for the whole AppState
    pub state_key: String,
    /// Delay before the chat typing placeholder appears
    pub typing_delay: Duration,
    /// Delay from typing placeholder to the AI reply
    pub reply_delay: Duration,
    /// Simulated insight generation latency
    pub insight_delay: Duration,
    /// Per-character interval for progressive insight reveal
    pub reveal_interval: Duration,
    /// Probability that a single insight trial fails
    pub insight_failure_rate: f64,
    /// Minimum payment as a share of total debt
    pub min_payment_rate: f64,
    /// Default extra monthly debt payment
    pub extra_payment: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            state_key: DEFAULT_STATE_KEY.to_string(),
            typing_delay: Duration::from_millis(100),
            reply_delay: Duration::from_millis(1000),
            insight_delay: Duration::from_millis(1000),
            reveal_interval: Duration::from_millis(25),
            insight_failure_rate: 0.05,
            min_payment_rate: 0.02,
            extra_payment: 250.0,
        }
    }
}

/// Raw file layout; every field optional
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    data_dir: Option<PathBuf>,
    state_key: Option<String>,
    chat: Option<RawChat>,
    insights: Option<RawInsights>,
    debt: Option<RawDebt>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    typing_delay_ms: Option<u64>,
    reply_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    delay_ms: Option<u64>,
    reveal_interval_ms: Option<u64>,
    failure_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDebt {
    min_payment_rate: Option<f64>,
    extra_payment: Option<f64>,
}

/// Get the default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("nova").join("config.toml"))
}

impl EngineConfig {
    /// Resolve file + override layers
    ///
    /// An explicit path that does not exist is an error; the default
    /// override location is only read when present. `env` answers
    /// `NOVA_*` lookups.
    pub fn load<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = match path {
            Some(p) => Some(fs::read_to_string(p).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", p.display(), e))
            })?),
            None => match default_config_path() {
                Some(p) if p.exists() => Some(fs::read_to_string(&p).map_err(|e| {
                    Error::Config(format!("Failed to read config {}: {}", p.display(), e))
                })?),
                _ => None,
            },
        };

        let mut config = match content {
            Some(text) => Self::from_toml(&text)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.validate()?;

        debug!(
            state_key = %config.state_key,
            failure_rate = config.insight_failure_rate,
            "Engine config resolved"
        );
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();
        if let Some(dir) = raw.data_dir {
            config.data_dir = Some(dir);
        }
        if let Some(key) = raw.state_key {
            config.state_key = key;
        }
        if let Some(chat) = raw.chat {
            if let Some(ms) = chat.typing_delay_ms {
                config.typing_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = chat.reply_delay_ms {
                config.reply_delay = Duration::from_millis(ms);
            }
        }
        if let Some(insights) = raw.insights {
            if let Some(ms) = insights.delay_ms {
                config.insight_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = insights.reveal_interval_ms {
                config.reveal_interval = Duration::from_millis(ms);
            }
            if let Some(rate) = insights.failure_rate {
                config.insight_failure_rate = rate;
            }
        }
        if let Some(debt) = raw.debt {
            if let Some(rate) = debt.min_payment_rate {
                config.min_payment_rate = rate;
            }
            if let Some(extra) = debt.extra_payment {
                config.extra_payment = extra;
            }
        }
        Ok(config)
    }

    /// Apply `NOVA_*` overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup(ENV_STATE_KEY) {
            self.state_key = key;
        }
        if let Some(rate) = lookup(ENV_INSIGHT_FAILURE_RATE) {
            self.insight_failure_rate = parse_env_f64(ENV_INSIGHT_FAILURE_RATE, &rate)?;
        }
        if let Some(rate) = lookup(ENV_MIN_PAYMENT_RATE) {
            self.min_payment_rate = parse_env_f64(ENV_MIN_PAYMENT_RATE, &rate)?;
        }
        if let Some(extra) = lookup(ENV_EXTRA_PAYMENT) {
            self.extra_payment = parse_env_f64(ENV_EXTRA_PAYMENT, &extra)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.state_key.trim().is_empty() {
            return Err(Error::Config("state_key must not be empty".to_string()));
        }
        // The key doubles as a file name under the data dir
        if !self
            .state_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Config(format!(
                "state_key may only contain letters, digits, '-' and '_', got '{}'",
                self.state_key
            )));
        }
        if !(0.0..=1.0).contains(&self.insight_failure_rate) {
            return Err(Error::Config(format!(
                "insight failure rate must be within [0, 1], got {}",
                self.insight_failure_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.min_payment_rate) {
            return Err(Error::Config(format!(
                "min payment rate must be within [0, 1], got {}",
                self.min_payment_rate
            )));
        }
        if !self.extra_payment.is_finite() || self.extra_payment < 0.0 {
            return Err(Error::Config(format!(
                "extra payment must be a non-negative amount, got {}",
                self.extra_payment
            )));
        }
        Ok(())
    }

    /// Data dir to use for the file backend
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::store::default_data_dir)
    }
}

fn parse_env_f64(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{} is not a number: '{}'", key, value)))
}
