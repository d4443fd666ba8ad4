//! Rumbo Gateway - Conversational travel assistant
//!
//! This library provides the core functionality for the Rumbo gateway:
//! - Context-driven reply composition (keyword rules + trip context)
//! - Weather and time triggered advisory notifications
//! - In-memory user session tracking
//! - External chat backend routing with deterministic local fallback
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP API (axum)                     │
//! │   /api/chat │ /api/notifications │ /api/weather     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Travel Agent                        │
//! │   SessionStore │ ReplyComposer │ NotificationEngine │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │             External collaborators                   │
//! │   Chat backend (Toqan)  │  Weather (OpenWeatherMap) │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! A background scanner sweeps active sessions on a fixed cadence and hands
//! triggered notifications to a delivery sink.

pub mod agent;
pub mod api;
pub mod backend;
pub mod composer;
pub mod config;
pub mod context;
pub mod daemon;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod store;
pub mod weather;

pub use agent::{ChatReply, ReplySource, TravelAgent};
pub use backend::{ChatBackend, ToqanClient};
pub use composer::ReplyComposer;
pub use config::Config;
pub use context::{TravelPhase, TravelerType, TripContext, DESTINATION_PLACEHOLDER};
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use notify::{
    LogSink, Notification, NotificationEngine, NotificationKind, NotificationRules,
    NotificationSink, Priority,
};
pub use scanner::{BackgroundScanner, ScannerConfig};
pub use store::{SessionStore, UserSession};
pub use weather::{OpenWeatherClient, WeatherLookup, WeatherReading};
