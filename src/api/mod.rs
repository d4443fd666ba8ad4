//! HTTP API server for the travel assistant
//!
//! Thin axum layer over [`TravelAgent`]: routes deserialize the wire shapes,
//! call the agent, and serialize soft-failure-friendly envelopes.

pub mod chat;
pub mod health;
pub mod notifications;
pub mod users;
pub mod weather;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::TravelAgent;
use crate::Result;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TravelAgent>,
}

/// Build the full application router
#[must_use]
pub fn router(state: ApiState) -> Router {
    let api = Router::new()
        .merge(chat::router())
        .merge(notifications::router())
        .merge(users::router())
        .merge(weather::router());

    let router = Router::new()
        .nest("/api", api)
        .merge(health::router())
        .with_state(state);

    // CORS layer for cross-origin requests from the chat frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: ApiState,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(agent: Arc<TravelAgent>, port: u16) -> Self {
        Self {
            state: ApiState { agent },
            port,
        }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
