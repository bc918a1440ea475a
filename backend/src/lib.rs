pub mod auth;
pub mod config;
pub mod listen;
pub mod logging;
pub mod ml;
pub mod routes;

pub use auth::{AuthError, AuthUser, TokenVerifier};
pub use config::Config;
pub use ml::{MlClient, MlError};

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_verifier: TokenVerifier,
    pub ml_client: MlClient,
}

/// Fallback for unmatched routes.
async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Not Found - {}", uri.path()) })),
    )
}

fn cors_layer(origins: &str) -> CorsLayer {
    let allow_origin = if origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|o| o.trim().parse::<HeaderValue>().ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors.origins);

    Router::new()
        .merge(routes::health::router(state.clone()))
        .nest("/api/ml", routes::ml::router(state))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(logging::request_logger))
        .layer(cors)
}
