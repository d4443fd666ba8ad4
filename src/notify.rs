//! Weather and time triggered advisory notifications
//!
//! Rules are evaluated independently per pass; weather rules first, then
//! hour triggers in ascending order. Nothing is deduplicated across passes:
//! suppression belongs to the delivery layer, not the engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::context::TravelPhase;
use crate::store::UserSession;
use crate::weather::WeatherLookup;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WeatherAlert,
    Recommendation,
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A single advisory notification, generated fresh per evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: Priority,
    pub message: String,
}

/// Static thresholds and trigger hours for the rule engine
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRules {
    /// Below this temperature (°C) a cold alert fires
    pub temperature_low_c: f64,
    /// Above this temperature (°C) a heat alert fires
    pub temperature_high_c: f64,
    /// Above this rain probability (%) an umbrella alert fires
    pub rain_probability_pct: u8,
    /// Local clock hours that trigger a recommendation while exploring
    pub trigger_hours: Vec<u32>,
}

impl Default for NotificationRules {
    fn default() -> Self {
        Self {
            temperature_low_c: 10.0,
            temperature_high_c: 35.0,
            rain_probability_pct: 70,
            trigger_hours: vec![8, 12, 18, 20],
        }
    }
}

/// Evaluates notification rules for a stored session.
///
/// Pure given its inputs apart from the single weather fetch per pass; never
/// mutates the session or the rules.
#[derive(Clone)]
pub struct NotificationEngine {
    weather: Arc<dyn WeatherLookup>,
    rules: NotificationRules,
}

impl NotificationEngine {
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherLookup>, rules: NotificationRules) -> Self {
        Self { weather, rules }
    }

    /// Evaluate all rules for `session` at `now`.
    ///
    /// Weather rules are checked against one reading fetched for the pass;
    /// multiple may fire from the same reading. Hour recommendations fire
    /// only while exploring, on exact hour equality.
    pub async fn evaluate(&self, session: &UserSession, now: DateTime<Local>) -> Vec<Notification> {
        let mut notifications = Vec::new();

        if let Some(destination) = session.context.destination.as_deref() {
            let reading = self.weather.fetch(destination).await;

            if reading.temperature_c < self.rules.temperature_low_c {
                notifications.push(Notification {
                    kind: NotificationKind::WeatherAlert,
                    priority: Priority::High,
                    message: format!(
                        "🧥 Temperatura baja: {}°C en {destination}. Recomendación: \
                         Lleva abrigo.",
                        reading.temperature_c
                    ),
                });
            }

            if reading.temperature_c > self.rules.temperature_high_c {
                notifications.push(Notification {
                    kind: NotificationKind::WeatherAlert,
                    priority: Priority::High,
                    message: format!(
                        "🌡️ Temperatura alta: {}°C en {destination}. Mantente \
                         hidratado y usa protector solar.",
                        reading.temperature_c
                    ),
                });
            }

            if reading.rain_probability_pct > self.rules.rain_probability_pct {
                notifications.push(Notification {
                    kind: NotificationKind::WeatherAlert,
                    priority: Priority::Medium,
                    message: format!(
                        "☔ Probabilidad de lluvia: {}% en {destination}. Lleva \
                         paraguas.",
                        reading.rain_probability_pct
                    ),
                });
            }
        }

        if session.context.travel_phase == Some(TravelPhase::Exploring) {
            let mut hours = self.rules.trigger_hours.clone();
            hours.sort_unstable();

            for hour in hours {
                // Exact equality, not a window
                if now.hour() == hour {
                    if let Some(text) = hour_recommendation(hour) {
                        notifications.push(Notification {
                            kind: NotificationKind::Recommendation,
                            priority: Priority::Low,
                            message: text.to_string(),
                        });
                    }
                }
            }
        }

        notifications
    }
}

/// Canned recommendation text per trigger hour
const fn hour_recommendation(hour: u32) -> Option<&'static str> {
    match hour {
        8 => Some(
            "🌅 ¡Buenos días! Perfecto momento para visitar atracciones antes de \
             las multitudes. ¿Te ayudo con un itinerario matutino?",
        ),
        12 => Some(
            "🍽️ ¡Es hora de almorzar! ¿Te ayudo a encontrar un restaurante cerca \
             de tu ubicación actual?",
        ),
        18 => Some(
            "🌅 Atardecer perfecto para fotos. ¿Conoces los mejores spots \
             fotográficos de tu destino?",
        ),
        20 => Some(
            "🌃 Perfecto momento para cenar y vida nocturna. ¿Te interesa la \
             gastronomía local o prefieres algo familiar?",
        ),
        _ => None,
    }
}

/// Destination for notifications produced by the background scanner
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a batch of notifications for one user
    ///
    /// # Errors
    ///
    /// Returns an error when delivery fails; the scanner logs and moves on.
    async fn deliver(&self, user_id: &str, notifications: &[Notification]) -> crate::Result<()>;
}

/// Sink that logs deliveries via `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, user_id: &str, notifications: &[Notification]) -> crate::Result<()> {
        tracing::info!(
            user_id = %user_id,
            count = notifications.len(),
            "notifications ready"
        );
        for notification in notifications {
            tracing::info!(
                user_id = %user_id,
                kind = ?notification.kind,
                priority = ?notification.priority,
                message = %notification.message,
            );
        }
        Ok(())
    }
}
