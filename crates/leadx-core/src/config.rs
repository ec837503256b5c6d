use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::CreditUsage;

pub const CONFIG_ENV: &str = "LEADX_CONFIG";

/// Delays of the simulated services, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub ai_suggest_ms: u64,
    pub template_assist_ms: u64,
    pub test_run_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            ai_suggest_ms: 1200,
            template_assist_ms: 1500,
            test_run_ms: 1800,
        }
    }
}

impl LatencyConfig {
    /// No waiting at all; handy for scripted runs.
    pub fn instant() -> Self {
        Self {
            ai_suggest_ms: 0,
            template_assist_ms: 0,
            test_run_ms: 0,
        }
    }

    pub fn ai_suggest(&self) -> Duration {
        Duration::from_millis(self.ai_suggest_ms)
    }

    pub fn template_assist(&self) -> Duration {
        Duration::from_millis(self.template_assist_ms)
    }

    pub fn test_run(&self) -> Duration {
        Duration::from_millis(self.test_run_ms)
    }
}

/// Plan totals. Unset values keep whatever the dataset says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub email_credits: Option<u32>,
    pub sms_credits: Option<u32>,
}

impl BillingConfig {
    pub fn apply(&self, mut credits: CreditUsage) -> CreditUsage {
        if let Some(total) = self.email_credits {
            credits.email.total = total;
        }
        if let Some(total) = self.sms_credits {
            credits.sms.total = total;
        }
        credits
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latency: LatencyConfig,
    pub billing: BillingConfig,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Reads the file named by `LEADX_CONFIG`, or falls back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => {
                debug!("{CONFIG_ENV} not set, using default configuration");
                Ok(Self::default())
            }
        }
    }
}
