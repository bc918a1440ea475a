use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metameal_backend::{app, listen, AppState, Config, MlClient, TokenVerifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set METAMEAL__AUTH__JWT_SECRET.",
            e
        )
    })?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MetaMeal backend");

    // Initialize components
    let token_verifier = TokenVerifier::new(&config.auth.jwt_secret);
    let ml_client = MlClient::new(&config.ml.base_url);
    tracing::info!("ML service proxy targeting {}", config.ml.base_url);

    let environment = config.environment.clone();
    let state = Arc::new(AppState {
        config: config.clone(),
        token_verifier,
        ml_client,
    });

    let app = app(state);

    // Bind with bounded port fallback, then serve
    let listener = listen::bind_with_fallback(&config.server.host, config.server.port).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Server running on port {} in {} mode", addr.port(), environment);

    axum::serve(listener, app).await?;

    Ok(())
}
