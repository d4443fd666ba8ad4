//! In-memory user session store
//!
//! A process-lifetime map from user ID to last-known trip context plus
//! activity bookkeeping. The store is an explicitly owned handle shared by
//! the request path and the background scanner; cloning is cheap.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::context::TripContext;

/// Last-known state for one user
#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub user_id: String,
    pub context: TripContext,
    pub last_activity: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub message_count: u64,
}

impl UserSession {
    /// Create a fresh session stamped with the current server time
    #[must_use]
    pub fn new(user_id: String, context: TripContext) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            context,
            last_activity: now,
            last_update: now,
            message_count: 0,
        }
    }
}

/// Shared, lock-guarded map of user sessions.
///
/// All operations key on exact user ID string equality. Timestamps always
/// come from the server clock, never from the caller.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, UserSession>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chat message: overlay `context`, refresh both timestamps,
    /// and increment the message count. Creates the session on first call.
    pub fn upsert_message(&self, user_id: &str, context: &TripContext) -> UserSession {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id.to_string(), TripContext::default()));

        let now = Utc::now();
        session.context.overlay(context);
        session.last_activity = now;
        session.last_update = now;
        session.message_count += 1;

        session.clone()
    }

    /// Merge a context-only update: overlay `context` and refresh both
    /// timestamps without touching the message count.
    pub fn update_context(&self, user_id: &str, context: &TripContext) -> UserSession {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id.to_string(), TripContext::default()));

        let now = Utc::now();
        session.context.overlay(context);
        session.last_activity = now;
        session.last_update = now;

        session.clone()
    }

    /// Snapshot of a session, if the user is known
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<UserSession> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    /// Sessions with activity inside the window ending at `now`
    #[must_use]
    pub fn list_active(&self, now: DateTime<Utc>, window: Duration) -> Vec<UserSession> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|s| now - s.last_activity < window)
            .cloned()
            .collect()
    }

    /// Drop sessions idle longer than `max_idle`, returning how many were
    /// removed. Run periodically by the scanner so the map cannot grow
    /// without bound.
    pub fn evict_stale(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_activity <= max_idle);
        before - sessions.len()
    }

    /// Number of tracked sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
