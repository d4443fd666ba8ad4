//! User context update endpoint

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::context::TripContext;

/// Context update request
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub user_id: Option<String>,

    #[serde(default)]
    pub context: TripContext,
}

/// Acknowledgement envelope
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Merge a context update into the user's session.
///
/// A request without a user ID is acknowledged without effect; an
/// undecodable body is reported as a soft failure.
async fn update(
    State(state): State<ApiState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Json<UpdateResponse> {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected context update");
            return Json(UpdateResponse {
                success: false,
                error: Some(rejection.to_string()),
            });
        }
    };

    if let Some(user_id) = request.user_id.as_deref() {
        state.agent.handle_context_update(user_id, &request.context);
    }

    Json(UpdateResponse {
        success: true,
        error: None,
    })
}

/// Build the user update router
pub fn router() -> Router<ApiState> {
    Router::new().route("/user/update", post(update))
}
