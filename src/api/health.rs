//! Health check endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub active_users: usize,
}

/// Detailed readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub store: CheckResult,
    pub backend: CheckResult,
}

/// Result of a single health check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            status: "unavailable",
            message: Some("not configured".to_string()),
        }
    }
}

/// Liveness probe - is the service running?
async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        active_users: state.agent.store().len(),
    })
}

/// Readiness probe - is the service ready to accept traffic?
async fn ready(State(state): State<ApiState>) -> (StatusCode, Json<ReadinessResponse>) {
    let backend_check = if state.agent.has_backend() {
        CheckResult::ok()
    } else {
        // Composer-only mode still serves traffic
        CheckResult::unavailable()
    };

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ok",
            checks: ReadinessChecks {
                store: CheckResult::ok(),
                backend: backend_check,
            },
        }),
    )
}

/// Build the health router
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}
