use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metameal_keepalive::{KeepAlive, KeepAliveConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = KeepAliveConfig::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut pinger = KeepAlive::from_config(&config);
    pinger.start();

    if pinger.is_active() {
        tracing::info!(
            "Pinging {}/health every {} ms",
            config.api_url.trim_end_matches('/'),
            config.ping_interval_ms
        );
    }

    // Probe until shutdown; ctrl-c is the service analog of page-unload.
    tokio::signal::ctrl_c().await?;
    pinger.stop();

    Ok(())
}
