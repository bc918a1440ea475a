//! Proxy routes to the workout-prediction ML service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::AppState;

/// GET /health - check the ML service connection.
async fn ml_health(State(state): State<Arc<AppState>>) -> Response {
    match state.ml_client.health().await {
        Ok(body) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "ml_service": body,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("ML service health check error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "unhealthy",
                    "error": "ML service is not available",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Merge the caller's user id into a prediction payload.
///
/// The authenticated id wins; a `user_id` already in the body is the
/// fallback. Non-object bodies are forwarded untouched.
fn inject_user_id(mut body: Value, user_id: Option<&str>) -> Value {
    if let (Value::Object(map), Some(id)) = (&mut body, user_id) {
        map.insert("user_id".to_string(), Value::String(id.to_string()));
    }
    body
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, Response> {
    state.token_verifier.authenticate(headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response()
    })
}

/// POST /predict-workout - forward a prediction request to the ML service.
async fn predict_workout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let payload = inject_user_id(body, Some(&user.sub));
    tracing::debug!("ML request payload: {}", payload);

    match state.ml_client.predict_workout(&payload).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            tracing::error!("ML service error: {}", e);
            let message = e.to_string();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": message,
                    "details": message,
                })),
            )
                .into_response()
        }
    }
}

/// POST /workout-suggestions - forward a suggestions request unchanged.
async fn workout_suggestions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }

    match state.ml_client.workout_suggestions(&body).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            tracing::error!("ML service error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to get workout suggestions",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(ml_health))
        .route("/predict-workout", post(predict_workout))
        .route("/workout-suggestions", post(workout_suggestions))
        .with_state(state)
}
