//! Travel agent — orchestrates sessions, backend routing, and fallbacks
//!
//! One instance is shared by the HTTP layer. The chat backend is optional;
//! without one (or when it errors) every reply comes from the deterministic
//! composer.

use std::sync::Arc;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::backend::ChatBackend;
use crate::composer::ReplyComposer;
use crate::context::TripContext;
use crate::notify::{Notification, NotificationEngine, NotificationRules};
use crate::store::SessionStore;
use crate::weather::{WeatherLookup, WeatherReading};

/// Where a chat reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// External chat backend answered
    Backend,
    /// Deterministic local composer answered
    Fallback,
}

impl ReplySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Fallback => "fallback",
        }
    }
}

/// A composed chat reply plus the context it was answered under
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub source: ReplySource,
    pub context: TripContext,
}

/// Core request orchestrator shared by the HTTP handlers
pub struct TravelAgent {
    store: SessionStore,
    weather: Arc<dyn WeatherLookup>,
    backend: Option<Arc<dyn ChatBackend>>,
    composer: ReplyComposer,
    engine: NotificationEngine,
}

impl TravelAgent {
    #[must_use]
    pub fn new(
        store: SessionStore,
        weather: Arc<dyn WeatherLookup>,
        backend: Option<Arc<dyn ChatBackend>>,
        rules: NotificationRules,
    ) -> Self {
        let composer = ReplyComposer::new(weather.clone());
        let engine = NotificationEngine::new(weather.clone(), rules);

        Self {
            store,
            weather,
            backend,
            composer,
            engine,
        }
    }

    /// Handle an inbound chat message.
    ///
    /// Updates the user's session, tries the chat backend when configured,
    /// and falls back to the local composer on any backend failure. Never
    /// fails: the reply is always non-empty text.
    pub async fn handle_chat(
        &self,
        user_id: &str,
        message: &str,
        mut context: TripContext,
    ) -> ChatReply {
        context.user_id = Some(user_id.to_string());
        if context.session_id.is_none() {
            context.session_id = Some(format!("session-{}", Uuid::new_v4()));
        }

        let session = self.store.upsert_message(user_id, &context);
        tracing::debug!(
            user_id = %user_id,
            message_count = session.message_count,
            "chat session updated"
        );

        if let Some(backend) = &self.backend {
            match backend.send(message, &context).await {
                Ok(response) => {
                    return ChatReply {
                        response,
                        source: ReplySource::Backend,
                        context,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "chat backend unavailable, composing locally");
                }
            }
        }

        let response = self.composer.compose(message, &context).await;
        ChatReply {
            response,
            source: ReplySource::Fallback,
            context,
        }
    }

    /// Evaluate notification rules for a user at `now`.
    ///
    /// An unknown user yields an empty list, not an error.
    pub async fn handle_notifications_at(
        &self,
        user_id: &str,
        now: DateTime<Local>,
    ) -> Vec<Notification> {
        match self.store.get(user_id) {
            Some(session) => self.engine.evaluate(&session, now).await,
            None => Vec::new(),
        }
    }

    /// Evaluate notification rules for a user at the current time
    pub async fn handle_notifications(&self, user_id: &str) -> Vec<Notification> {
        self.handle_notifications_at(user_id, Local::now()).await
    }

    /// Merge a context-only update into the user's session
    pub fn handle_context_update(&self, user_id: &str, context: &TripContext) {
        self.store.update_context(user_id, context);
    }

    /// Current weather for a place (fallback reading on lookup failure)
    pub async fn handle_weather(&self, place: &str) -> WeatherReading {
        self.weather.fetch(place).await
    }

    /// Whether an external chat backend is configured
    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Handle to the shared session store
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handle to the notification engine (shared with the scanner)
    #[must_use]
    pub fn engine(&self) -> &NotificationEngine {
        &self.engine
    }
}
