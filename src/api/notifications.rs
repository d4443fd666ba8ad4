//! Notification polling endpoint

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::ApiState;
use crate::notify::Notification;

/// Notifications response envelope
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub success: bool,
    pub notifications: Vec<Notification>,
}

/// Current notifications for a user; unknown users get an empty list
async fn notifications(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Json<NotificationsResponse> {
    let notifications = state.agent.handle_notifications(&user_id).await;

    Json(NotificationsResponse {
        success: true,
        notifications,
    })
}

/// Build the notifications router
pub fn router() -> Router<ApiState> {
    Router::new().route("/notifications/{user_id}", get(notifications))
}
