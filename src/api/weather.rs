//! Weather query endpoint

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::ApiState;
use crate::weather::WeatherReading;

/// Weather response envelope
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub success: bool,
    pub data: WeatherReading,
}

/// Current weather for a place; lookup failures yield the fallback reading
async fn weather(
    State(state): State<ApiState>,
    Path(place): Path<String>,
) -> Json<WeatherResponse> {
    let data = state.agent.handle_weather(&place).await;

    Json(WeatherResponse {
        success: true,
        data,
    })
}

/// Build the weather router
pub fn router() -> Router<ApiState> {
    Router::new().route("/weather/{place}", get(weather))
}
