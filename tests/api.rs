//! API endpoint integration tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use rumbo_gateway::{NotificationRules, SessionStore, TravelAgent, WeatherReading};

mod common;
use common::{agent_with_weather, test_router, DownBackend, StubWeather};

fn reading(temp: f64, description: &str, humidity: u8, rain: u8) -> WeatherReading {
    WeatherReading {
        temperature_c: temp,
        description: description.to_string(),
        humidity_pct: humidity,
        rain_probability_pct: rain,
        is_live: true,
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    let (status, json) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["active_users"], 0);
}

#[tokio::test]
async fn test_ready_endpoint_without_backend() {
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    let (status, json) = get(app, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["backend"]["status"], "unavailable");
}

#[tokio::test]
async fn test_chat_weather_scenario() {
    // Sunny Lima: clear-day branch with the reading values verbatim
    let app = test_router(agent_with_weather(reading(28.0, "soleado", 40, 10)));

    let (status, json) = post_json(
        app,
        "/api/chat",
        r#"{
            "user_id": "u1",
            "message": "¿cómo está el clima?",
            "context": {
                "destination": "Lima",
                "traveler_type": "adventure",
                "travel_phase": "exploring"
            }
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], "fallback");

    let response = json["response"].as_str().unwrap();
    assert!(response.contains("28"));
    assert!(response.contains("soleado"));
    assert!(response.contains("40"));
    assert!(response.contains("Día despejado"));
    assert!(!response.contains("Posible lluvia"));

    // Context is echoed back with the caller's fields preserved
    assert_eq!(json["context"]["destination"], "Lima");
    assert_eq!(json["context"]["user_id"], "u1");
}

#[tokio::test]
async fn test_chat_falls_back_when_backend_is_down() {
    let agent = Arc::new(TravelAgent::new(
        SessionStore::new(),
        Arc::new(StubWeather(WeatherReading::fallback())),
        Some(Arc::new(DownBackend)),
        NotificationRules::default(),
    ));
    let app = test_router(agent);

    let (status, json) = post_json(
        app,
        "/api/chat",
        r#"{"user_id": "u1", "message": "hola", "context": {"destination": "Lima"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], "fallback");
    assert!(!json["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_malformed_body_softly() {
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    let (status, json) = post_json(app, "/api/chat", "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
    assert!(json["response"].as_str().unwrap().contains("Lo siento"));
}

#[tokio::test]
async fn test_notifications_for_unknown_user() {
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    let (status, json) = get(app, "/api/notifications/nadie").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["notifications"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_then_cold_weather_notification() {
    let agent = agent_with_weather(reading(5.0, "nevado", 80, 10));
    let app = test_router(agent);

    let (_, json) = post_json(
        app.clone(),
        "/api/user/update",
        r#"{"user_id": "u1", "context": {"destination": "Ushuaia", "travel_phase": "planning"}}"#,
    )
    .await;
    assert_eq!(json["success"], true);

    let (status, json) = get(app, "/api/notifications/u1").await;

    assert_eq!(status, StatusCode::OK);
    let notifications = json["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "weather_alert");
    assert_eq!(notifications[0]["priority"], "high");
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains("Lleva abrigo"));
}

#[tokio::test]
async fn test_weather_endpoint_reports_fallback_reading() {
    // The stub returns the fallback constant, as the HTTP client does when
    // the upstream API is unreachable
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    let (status, json) = get(app, "/api/weather/Lima").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["temperature_c"], 22.0);
    assert_eq!(json["data"]["description"], "parcialmente nublado");
    assert_eq!(json["data"]["humidity_pct"], 65);
    assert_eq!(json["data"]["rain_probability_pct"], 20);
    assert_eq!(json["data"]["is_live"], false);
}

#[tokio::test]
async fn test_chat_increments_active_users() {
    let app = test_router(agent_with_weather(WeatherReading::fallback()));

    post_json(
        app.clone(),
        "/api/chat",
        r#"{"user_id": "u1", "message": "hola"}"#,
    )
    .await;

    let (_, json) = get(app, "/health").await;
    assert_eq!(json["active_users"], 1);
}
