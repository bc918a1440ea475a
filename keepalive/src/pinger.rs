//! Timer-driven liveness probing.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::config::{Environment, KeepAliveConfig};

/// Default probe period: 13 minutes.
pub const PING_INTERVAL: Duration = Duration::from_millis(780_000);

/// Keeps the backend warm by probing its health endpoint on a fixed period.
///
/// The pinger is Active exactly while the timer task handle is held; `start`
/// and `stop` are idempotent.
pub struct KeepAlive {
    api_url: String,
    environment: Environment,
    ping_interval: Duration,
    http_client: Client,
    handle: Option<JoinHandle<()>>,
}

impl KeepAlive {
    pub fn new(api_url: &str, environment: Environment) -> Self {
        Self::with_interval(api_url, environment, PING_INTERVAL)
    }

    /// Construct with a custom probe period. Tests compress time with this;
    /// production uses [`PING_INTERVAL`].
    pub fn with_interval(api_url: &str, environment: Environment, ping_interval: Duration) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            environment,
            ping_interval,
            http_client: Client::new(),
            handle: None,
        }
    }

    pub fn from_config(config: &KeepAliveConfig) -> Self {
        Self::with_interval(
            &config.api_url,
            config.environment,
            Duration::from_millis(config.ping_interval_ms),
        )
    }

    /// Whether the repeating probe timer is armed.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Arm the probe timer: one immediate probe, then one per period.
    ///
    /// No-op when already active. Local environments never activate.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        if self.environment == Environment::Local {
            tracing::info!("Keep-alive service disabled in local environment");
            return;
        }

        tracing::info!("Starting backend keep-alive service...");

        let client = self.http_client.clone();
        let url = format!("{}/health", self.api_url);
        let period = self.ping_interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                // The first tick completes immediately, so the initial
                // probe fires on start rather than one period later.
                ticker.tick().await;
                probe(&client, &url).await;
            }
        }));
    }

    /// Disarm the probe timer. No-op when idle.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        tracing::info!("Stopping backend keep-alive service...");
        handle.abort();
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A single liveness probe.
///
/// Every outcome is observational: success and failure are logged, nothing
/// is returned, and the timer loop keeps ticking past failed probes.
async fn probe(client: &Client, url: &str) {
    let result = client
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            tracing::info!("Backend keep-alive ping successful");
        }
        Ok(response) => {
            tracing::warn!(
                "Backend responded but not healthy: status {}",
                response.status().as_u16()
            );
        }
        Err(e) => {
            tracing::warn!("Backend keep-alive ping failed: {}", e);
        }
    }
}
