//! Configuration for the keep-alive pinger.

use config::{Config as ConfigLoader, ConfigError, Environment as EnvVars, File};
use serde::Deserialize;

/// Deployment context the pinger is running in.
///
/// An explicit flag instead of sniffing the runtime's hostname, so the
/// activation policy is visible in configuration and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Deployed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeepAliveConfig {
    /// Base URL of the backend to keep alive.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// The pinger only activates when deployed; local runs stay idle.
    #[serde(default = "default_environment")]
    pub environment: Environment,
    /// Probe period in milliseconds. 13 minutes keeps the free-tier host
    /// from suspending the backend (it idles after 15 without traffic).
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            environment: default_environment(),
            ping_interval_ms: default_ping_interval_ms(),
        }
    }
}

fn default_api_url() -> String {
    "https://metameal-backend.onrender.com".to_string()
}
fn default_environment() -> Environment {
    Environment::Local
}
fn default_ping_interval_ms() -> u64 {
    780_000
}

impl KeepAliveConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (KEEPALIVE__KEY format)
    /// 2. keepalive.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("keepalive").required(false))
            .add_source(
                EnvVars::with_prefix("KEEPALIVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
