//! Chat endpoint

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::context::TripContext;

/// User-safe apology returned on a malformed request or internal fault
const APOLOGY: &str =
    "Lo siento, tengo problemas técnicos temporales. ¿Puedes intentar de nuevo? 😅";

fn default_user_id() -> String {
    "anonymous".to_string()
}

/// Inbound chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// A missing message composes the generic reply, not an error
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub context: TripContext,
}

/// Chat response envelope
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<TripContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Handle an inbound chat message.
///
/// Transport and backend failures never surface here; the only failure
/// shape is a structured envelope for requests that can't be decoded.
async fn chat(
    State(state): State<ApiState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let timestamp = Utc::now().to_rfc3339();

    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected chat request");
            return Json(ChatResponse {
                success: false,
                response: APOLOGY.to_string(),
                timestamp,
                source: None,
                context: None,
                error: Some(rejection.to_string()),
            });
        }
    };

    let reply = state
        .agent
        .handle_chat(&request.user_id, &request.message, request.context)
        .await;

    Json(ChatResponse {
        success: true,
        response: reply.response,
        timestamp,
        source: Some(reply.source.as_str()),
        context: Some(reply.context),
        error: None,
    })
}

/// Build the chat router
pub fn router() -> Router<ApiState> {
    Router::new().route("/chat", post(chat))
}
