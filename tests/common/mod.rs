//! Shared test utilities

use std::sync::Arc;

use async_trait::async_trait;

use rumbo_gateway::{
    ChatBackend, Error, NotificationRules, SessionStore, TravelAgent, TripContext, WeatherLookup,
    WeatherReading,
};

/// Weather stub returning a fixed reading
pub struct StubWeather(pub WeatherReading);

#[async_trait]
impl WeatherLookup for StubWeather {
    async fn fetch(&self, _place: &str) -> WeatherReading {
        self.0.clone()
    }
}

/// Backend stub that always fails, forcing the composer path
pub struct DownBackend;

#[async_trait]
impl ChatBackend for DownBackend {
    async fn send(&self, _message: &str, _context: &TripContext) -> rumbo_gateway::Result<String> {
        Err(Error::Backend("unreachable".to_string()))
    }
}

/// Build an agent with a stubbed weather reading and no chat backend
#[must_use]
pub fn agent_with_weather(reading: WeatherReading) -> Arc<TravelAgent> {
    Arc::new(TravelAgent::new(
        SessionStore::new(),
        Arc::new(StubWeather(reading)),
        None,
        NotificationRules::default(),
    ))
}

/// Build the application router around an agent
#[must_use]
pub fn test_router(agent: Arc<TravelAgent>) -> axum::Router {
    rumbo_gateway::api::router(rumbo_gateway::api::ApiState { agent })
}
