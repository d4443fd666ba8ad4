//! External conversational-AI backend (Toqan)
//!
//! The backend is best-effort: any transport failure, timeout, or non-2xx
//! status makes the caller fall back to the local reply composer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::{TravelPhase, TripContext};
use crate::{Error, Result};

/// External chat backend for AI-generated replies
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a user message with trip context, returning the reply text
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable, times out, answers
    /// with a non-success status, or returns an unusable payload.
    async fn send(&self, message: &str, context: &TripContext) -> Result<String>;
}

/// Client for the Toqan conversational API
pub struct ToqanClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    space_id: String,
}

impl ToqanClient {
    /// Create a new client with a bounded request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        space_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            space_id: space_id.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for ToqanClient {
    async fn send(&self, message: &str, context: &TripContext) -> Result<String> {
        let prompt = build_travel_prompt(message, context);

        let payload = serde_json::json!({
            "message": prompt,
            "spaceId": self.space_id,
            "sessionId": context.session_id,
            "userId": context.user_id,
            "context": {
                "destination": context.destination,
                "traveler_type": context.traveler_type,
                "travel_phase": context.travel_phase,
                "timestamp": Utc::now().to_rfc3339(),
            },
        });

        tracing::debug!(space_id = %self.space_id, "sending message to chat backend");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("User-Agent", "Rumbo-Gateway/1.0")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "chat backend error");
            return Err(Error::Backend(format!("backend error {status}")));
        }

        let body: serde_json::Value = response.json().await?;
        extract_reply_text(&body)
            .ok_or_else(|| Error::Backend("unexpected response format".to_string()))
    }
}

/// Build the travel-assistant prompt wrapping the user message with context
fn build_travel_prompt(message: &str, context: &TripContext) -> String {
    let destination = context.destination.as_deref().unwrap_or("No especificado");
    let traveler_type = context.traveler_type_or_default().as_str();
    let travel_phase = context.travel_phase.map_or("planning", TravelPhase::as_str);

    format!(
        "Eres un asistente experto de viajes. Tu nombre es \"Rumbo\".\n\
         \n\
         CONTEXTO DEL USUARIO:\n\
         - Destino: {destination}\n\
         - Tipo de viajero: {traveler_type}\n\
         - Fase del viaje: {travel_phase}\n\
         \n\
         CONSULTA DEL USUARIO: {message}\n\
         \n\
         INSTRUCCIONES:\n\
         - Responde de manera amigable, práctica y específica para viajes\n\
         - Sé conciso pero completo\n\
         - Si no tienes información exacta, sugiere alternativas\n\
         - Enfócate en ayudar con el viaje específico del usuario"
    )
}

/// Pull the reply text out of the backend payload.
///
/// The API has shipped the text under different keys across versions.
fn extract_reply_text(body: &serde_json::Value) -> Option<String> {
    ["response", "message", "content"]
        .iter()
        .find_map(|key| body.get(key).and_then(|v| v.as_str()))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TravelerType;

    #[test]
    fn test_prompt_embeds_context() {
        let context = TripContext {
            destination: Some("París, Francia".to_string()),
            traveler_type: Some(TravelerType::Cultural),
            travel_phase: Some(TravelPhase::Planning),
            ..TripContext::default()
        };

        let prompt = build_travel_prompt("¿cómo está el clima?", &context);
        assert!(prompt.contains("París, Francia"));
        assert!(prompt.contains("cultural"));
        assert!(prompt.contains("planning"));
        assert!(prompt.contains("¿cómo está el clima?"));
    }

    #[test]
    fn test_prompt_defaults_for_missing_context() {
        let prompt = build_travel_prompt("hola", &TripContext::default());
        assert!(prompt.contains("No especificado"));
        assert!(prompt.contains("general"));
        assert!(prompt.contains("planning"));
    }

    #[test]
    fn test_extract_reply_text_key_precedence() {
        let body = serde_json::json!({ "message": "segunda", "response": "primera" });
        assert_eq!(extract_reply_text(&body).as_deref(), Some("primera"));

        let body = serde_json::json!({ "content": "tercera" });
        assert_eq!(extract_reply_text(&body).as_deref(), Some("tercera"));

        let body = serde_json::json!({ "status": "ok" });
        assert!(extract_reply_text(&body).is_none());
    }
}
