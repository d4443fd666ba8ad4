//! Daemon - the main gateway service
//!
//! Wires configuration into the agent, API server, and background scanner,
//! and runs until interrupted.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ApiServer;
use crate::backend::{ChatBackend, ToqanClient};
use crate::notify::LogSink;
use crate::scanner::BackgroundScanner;
use crate::store::SessionStore;
use crate::weather::{OpenWeatherClient, WeatherLookup};
use crate::{Config, Result, TravelAgent};

/// The Rumbo daemon - orchestrates the API server and notification scanner
pub struct Daemon {
    config: Config,
}

impl Daemon {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize the chat backend client, if one is configured
    fn init_backend(&self) -> Result<Option<Arc<dyn ChatBackend>>> {
        let Some(api_key) = self.config.backend.api_key.clone() else {
            tracing::warn!("no chat backend key configured, replies come from the composer");
            return Ok(None);
        };

        let space_id = self.config.backend.space_id.clone().unwrap_or_default();
        let client = ToqanClient::new(
            self.config.backend.api_url.clone(),
            api_key,
            space_id,
            self.config.backend.timeout,
        )?;

        tracing::info!(url = %self.config.backend.api_url, "chat backend initialized");
        Ok(Some(Arc::new(client)))
    }

    /// Run the daemon until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if initialization fails or the API server dies
    pub async fn run(self) -> Result<()> {
        let weather: Arc<dyn WeatherLookup> = Arc::new(OpenWeatherClient::new(
            self.config.weather.api_url.clone(),
            self.config.weather.api_key.clone().unwrap_or_default(),
            self.config.weather.timeout,
        )?);

        let backend = self.init_backend()?;

        let store = SessionStore::new();
        let agent = Arc::new(TravelAgent::new(
            store.clone(),
            weather,
            backend,
            self.config.notifications.clone(),
        ));

        let scanner = BackgroundScanner::new(
            store,
            agent.engine().clone(),
            Arc::new(LogSink),
            self.config.scanner.clone(),
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let scanner_handle = scanner.spawn(shutdown_rx);

        let server = ApiServer::new(agent, self.config.port);

        tokio::select! {
            result = server.run() => {
                // Server exit (bind failure or fatal serve error) stops the daemon
                let _ = shutdown_tx.send(true);
                let _ = scanner_handle.await;
                result
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                let _ = shutdown_tx.send(true);
                let _ = scanner_handle.await;
                Ok(())
            }
        }
    }
}
