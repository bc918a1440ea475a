use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for communicating with the workout-prediction ML service.
///
/// Constructed once at startup and shared through `AppState`, so tests can
/// point it at a mock server instead of the real service.
pub struct MlClient {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MlError {
    /// Network-level failure: DNS, connect, or I/O error before a response.
    #[error("{0}")]
    RequestFailed(String),
    /// The ML service answered with a non-2xx status.
    #[error("{message}")]
    UpstreamStatus { status: u16, message: String },
    /// The ML service answered 2xx but the body was not valid JSON.
    #[error("Invalid response from ML service: {0}")]
    InvalidResponse(String),
}

impl MlClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check the ML service's own health endpoint.
    pub async fn health(&self) -> Result<Value, MlError> {
        let url = format!("{}/health", self.base_url);

        tracing::debug!("Checking ML service health at {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| MlError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(MlError::UpstreamStatus {
                status,
                message: format!("ML service responded with status: {}", status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| MlError::InvalidResponse(e.to_string()))
    }

    /// Forward a workout-prediction payload to the ML service.
    pub async fn predict_workout(&self, payload: &Value) -> Result<Value, MlError> {
        self.post_json("/predict-workout", payload).await
    }

    /// Forward a workout-suggestions payload to the ML service.
    pub async fn workout_suggestions(&self, payload: &Value) -> Result<Value, MlError> {
        self.post_json("/workout-suggestions", payload).await
    }

    /// POST a JSON payload and relay the parsed JSON response.
    ///
    /// A single attempt per call: no retry, no backoff. On a non-2xx status
    /// the error body is parsed best-effort (empty object if unparseable) and
    /// an upstream-supplied `error` message wins over the generic status line.
    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value, MlError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!("Forwarding request to ML service: {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| MlError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_body: Value = response.json().await.unwrap_or_else(|_| json!({}));
            tracing::error!("ML service error response: {}", error_body);
            let message = error_body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("ML service responded with status: {}", status));
            return Err(MlError::UpstreamStatus { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| MlError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MlClient::new("http://localhost:5001/");
        assert_eq!(client.base_url, "http://localhost:5001");
    }

    #[test]
    fn test_upstream_error_displays_message_only() {
        let err = MlError::UpstreamStatus {
            status: 400,
            message: "bad goal".to_string(),
        };
        assert_eq!(err.to_string(), "bad goal");
    }
}
