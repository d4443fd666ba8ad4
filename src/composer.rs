//! Deterministic reply composition from keyword rules and trip context
//!
//! This is the fallback path when the chat backend is unavailable, and the
//! only path when none is configured. Categories are checked in a fixed
//! priority order; the first match wins.

use std::sync::Arc;

use crate::context::{TravelPhase, TravelerType, TripContext};
use crate::weather::WeatherLookup;

const WEATHER_KEYWORDS: &[&str] = &["clima", "tiempo", "lluvia", "temperatura"];
const FOOD_KEYWORDS: &[&str] = &["restaurante", "comida", "comer", "almorzar", "cenar"];
const LODGING_KEYWORDS: &[&str] = &["hotel", "alojamiento", "dormir", "check"];
const TRANSPORT_KEYWORDS: &[&str] = &["transporte", "metro", "taxi", "bus", "movimiento"];
const CURRENCY_KEYWORDS: &[&str] = &["moneda", "dinero", "cambio", "pagar"];
const LANGUAGE_KEYWORDS: &[&str] = &["idioma", "hablar", "frases", "comunicar"];
const SAFETY_KEYWORDS: &[&str] = &["seguridad", "peligro", "cuidado", "emergencia"];
const ACTIVITY_KEYWORDS: &[&str] = &["actividades", "hacer", "visitar", "turismo"];

/// Composes replies from the message, trip context, and current weather.
///
/// Always returns non-empty text and never fails: a weather lookup problem
/// degrades to the fallback reading inside the lookup itself.
#[derive(Clone)]
pub struct ReplyComposer {
    weather: Arc<dyn WeatherLookup>,
}

impl ReplyComposer {
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherLookup>) -> Self {
        Self { weather }
    }

    /// Compose a reply for `message` under `context`
    pub async fn compose(&self, message: &str, context: &TripContext) -> String {
        let lowered = message.to_lowercase();
        let destination = context.destination_or_placeholder();
        let traveler_type = context.traveler_type_or_default();

        if contains_any(&lowered, WEATHER_KEYWORDS) {
            return self.weather_reply(destination).await;
        }

        if contains_any(&lowered, FOOD_KEYWORDS) {
            let rec = food_recommendation(traveler_type);
            return format!(
                "🍽️ Para un viajero {} en {destination}, te recomiendo {rec}. \
                 ¿Te interesa alguna cocina específica? También puedo sugerirte \
                 horarios ideales para evitar multitudes.",
                traveler_type.as_str()
            );
        }

        if contains_any(&lowered, LODGING_KEYWORDS) {
            return format!(
                "🏨 Para tu estadía en {destination}: Check-in típicamente 15:00, \
                 check-out 11:00. Te recomiendo confirmar horarios con tu hotel. \
                 ¿Necesitas ayuda con late check-out o early check-in?"
            );
        }

        if contains_any(&lowered, TRANSPORT_KEYWORDS) {
            return format!(
                "🚇 Transporte en {destination}: Te recomiendo apps locales de \
                 transporte y tarjetas de transporte público para ahorrar. ¿Te ayudo \
                 con rutas específicas o mejor forma de llegar a algún lugar?"
            );
        }

        if contains_any(&lowered, CURRENCY_KEYWORDS) {
            return format!(
                "💱 Para {destination}: Te recomiendo llevar efectivo local y una \
                 tarjeta internacional sin comisiones. Muchos lugares aceptan tarjeta, \
                 pero mercados y pequeños comercios prefieren efectivo."
            );
        }

        if contains_any(&lowered, LANGUAGE_KEYWORDS) {
            return format!(
                "🗣️ Comunicación en {destination}: Las frases básicas más útiles son \
                 'Hola', 'Gracias', 'Disculpe', '¿Habla inglés?', y 'La cuenta, por \
                 favor'. ¿Te ayudo con pronunciación o frases específicas?"
            );
        }

        if contains_any(&lowered, SAFETY_KEYWORDS) {
            return format!(
                "🛡️ Seguridad en {destination}: Mantén copias de documentos \
                 importantes, evita mostrar objetos de valor, usa transporte oficial. \
                 Número de emergencias local disponible en tu hotel. ¿Necesitas info \
                 específica de tu zona?"
            );
        }

        if contains_any(&lowered, ACTIVITY_KEYWORDS) {
            let activities = activity_recommendation(traveler_type);
            return format!(
                "🎯 Actividades recomendadas en {destination} para ti: {activities}. \
                 ¿Te interesa algo específico o prefieres un itinerario completo del día?"
            );
        }

        match context.travel_phase {
            Some(TravelPhase::Planning) => format!(
                "✈️ ¡Genial que estés planeando tu viaje a {destination}! Te puedo \
                 ayudar con clima, actividades, presupuesto, documentos necesarios. \
                 ¿Qué te interesa saber primero?"
            ),
            Some(TravelPhase::Departure) => format!(
                "🛄 ¡Casi listo para viajar a {destination}! Recuerda llegar 3 horas \
                 antes para vuelos internacionales, documentos en orden, y revisar \
                 restricciones de equipaje. ¿Necesitas ayuda con algo específico?"
            ),
            Some(TravelPhase::Arrival) => format!(
                "🛬 ¡Bienvenido a {destination}! Las primeras cosas: transporte al \
                 hotel, cambio de dinero si necesitas, y orientarte con la ciudad. \
                 ¿En qué te ayudo primero?"
            ),
            Some(TravelPhase::Exploring) => format!(
                "🗺️ ¡Perfecto para explorar {destination}! Te puedo ayudar con \
                 recomendaciones cercanas, horarios de atracciones, mejores rutas, y \
                 tips locales. ¿Qué planes tienes hoy?"
            ),
            Some(TravelPhase::Return) => format!(
                "🧳 Preparando el regreso desde {destination}: Check-out del hotel, \
                 compras de último momento, horarios al aeropuerto. ¿Necesitas ayuda \
                 con algo específico?"
            ),
            None => format!(
                "¡Perfecto! Como viajero {} en {destination}, te puedo ayudar con \
                 muchísimas cosas: clima actual, restaurantes, actividades, \
                 transporte, consejos locales. ¿Hay algo específico que te interese \
                 saber? 🤔",
                traveler_type.as_str()
            ),
        }
    }

    async fn weather_reply(&self, destination: &str) -> String {
        let reading = self.weather.fetch(destination).await;

        // Strict >50: exactly 50% reads as a clear day
        let sky = if reading.rain_probability_pct > 50 {
            "☔ Posible lluvia"
        } else {
            "☀️ Día despejado"
        };

        format!(
            "🌤️ El clima en {destination}: {}°C, {}. Humedad: {}%. {sky}. \
             ¡Perfecto para explorar!",
            reading.temperature_c, reading.description, reading.humidity_pct
        )
    }
}

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| message.contains(kw))
}

fn food_recommendation(traveler_type: TravelerType) -> &'static str {
    match traveler_type {
        TravelerType::Cultural => "restaurantes tradicionales con historia local",
        TravelerType::Adventure => "lugares de comida rápida cerca de actividades",
        TravelerType::Relax => "restaurantes con ambiente tranquilo y vista",
        TravelerType::Gastronomy => "experiencias gastronómicas únicas y mercados locales",
        TravelerType::Business => "restaurantes ejecutivos y de networking",
        TravelerType::General => "restaurantes recomendados",
    }
}

fn activity_recommendation(traveler_type: TravelerType) -> &'static str {
    match traveler_type {
        TravelerType::Cultural => "museos, sitios históricos, tours guiados",
        TravelerType::Adventure => "deportes extremos, hiking, actividades al aire libre",
        TravelerType::Relax => "spas, playas, parques tranquilos",
        TravelerType::Gastronomy => "tours gastronómicos, mercados, clases de cocina",
        TravelerType::Business => "centros de negocios, networking events, tours ejecutivos",
        TravelerType::General => "atracciones principales",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::weather::WeatherReading;

    /// Weather stub returning a fixed reading and counting calls
    struct StubWeather {
        reading: WeatherReading,
        calls: AtomicUsize,
    }

    impl StubWeather {
        fn new(reading: WeatherReading) -> Arc<Self> {
            Arc::new(Self {
                reading,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherLookup for StubWeather {
        async fn fetch(&self, _place: &str) -> WeatherReading {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reading.clone()
        }
    }

    fn reading(temp: f64, description: &str, humidity: u8, rain: u8) -> WeatherReading {
        WeatherReading {
            temperature_c: temp,
            description: description.to_string(),
            humidity_pct: humidity,
            rain_probability_pct: rain,
            is_live: true,
        }
    }

    fn context(destination: &str) -> TripContext {
        TripContext {
            destination: Some(destination.to_string()),
            ..TripContext::default()
        }
    }

    #[tokio::test]
    async fn test_weather_reply_embeds_reading_verbatim() {
        let stub = StubWeather::new(reading(28.0, "soleado", 40, 10));
        let composer = ReplyComposer::new(stub.clone());

        let mut ctx = context("Lima");
        ctx.traveler_type = Some(TravelerType::Adventure);
        ctx.travel_phase = Some(TravelPhase::Exploring);

        let reply = composer.compose("¿cómo está el clima?", &ctx).await;

        assert_eq!(stub.call_count(), 1);
        assert!(reply.contains("28"));
        assert!(reply.contains("soleado"));
        assert!(reply.contains("40"));
        assert!(reply.contains("Día despejado"));
        assert!(!reply.contains("Posible lluvia"));
    }

    #[tokio::test]
    async fn test_rain_probability_boundary() {
        let stub = StubWeather::new(reading(20.0, "nublado", 80, 51));
        let composer = ReplyComposer::new(stub);
        let reply = composer.compose("va a haber lluvia?", &context("Quito")).await;
        assert!(reply.contains("Posible lluvia"));

        let stub = StubWeather::new(reading(20.0, "nublado", 80, 50));
        let composer = ReplyComposer::new(stub);
        let reply = composer.compose("va a haber lluvia?", &context("Quito")).await;
        assert!(reply.contains("Día despejado"));
    }

    #[tokio::test]
    async fn test_keyword_priority_food_before_transport() {
        let stub = StubWeather::new(WeatherReading::fallback());
        let composer = ReplyComposer::new(stub.clone());

        let reply = composer
            .compose("¿dónde puedo comer cerca del metro?", &context("Bogotá"))
            .await;

        assert!(reply.contains("🍽️"));
        assert!(!reply.contains("🚇"));
        // Non-weather branches never hit the weather collaborator
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_food_reply_uses_traveler_table() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));

        let mut ctx = context("Madrid");
        ctx.traveler_type = Some(TravelerType::Gastronomy);
        let reply = composer.compose("busco un restaurante", &ctx).await;
        assert!(reply.contains("experiencias gastronómicas únicas y mercados locales"));

        let reply = composer
            .compose("busco un restaurante", &context("Madrid"))
            .await;
        assert!(reply.contains("restaurantes recomendados"));
    }

    #[tokio::test]
    async fn test_lodging_reply_has_check_times() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));
        let reply = composer.compose("a qué hora es el check-in", &context("Roma")).await;
        assert!(reply.contains("15:00"));
        assert!(reply.contains("11:00"));
        assert!(reply.contains("Roma"));
    }

    #[tokio::test]
    async fn test_activity_reply_uses_traveler_table() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));

        let mut ctx = context("Cusco");
        ctx.traveler_type = Some(TravelerType::Adventure);
        let reply = composer.compose("qué actividades hay", &ctx).await;
        assert!(reply.contains("deportes extremos, hiking, actividades al aire libre"));
    }

    #[tokio::test]
    async fn test_phase_branches_when_no_keyword_matches() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));

        let mut ctx = context("Tokio");
        ctx.travel_phase = Some(TravelPhase::Departure);
        let reply = composer.compose("hola", &ctx).await;
        assert!(reply.contains("🛄"));
        assert!(reply.contains("Tokio"));

        ctx.travel_phase = Some(TravelPhase::Return);
        let reply = composer.compose("hola", &ctx).await;
        assert!(reply.contains("🧳"));
    }

    #[tokio::test]
    async fn test_generic_reply_without_phase() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));

        let mut ctx = context("Lima");
        ctx.traveler_type = Some(TravelerType::Relax);
        let reply = composer.compose("hola", &ctx).await;
        assert!(reply.contains("viajero relax"));
        assert!(reply.contains("Lima"));
    }

    #[tokio::test]
    async fn test_placeholder_destination() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));
        let reply = composer.compose("qué tiempo hace", &TripContext::default()).await;
        assert!(reply.contains("tu destino"));
    }

    #[tokio::test]
    async fn test_keyword_match_is_case_insensitive() {
        let composer = ReplyComposer::new(StubWeather::new(WeatherReading::fallback()));
        let reply = composer.compose("EL CLIMA POR FAVOR", &context("Lima")).await;
        assert!(reply.contains("🌤️"));
    }
}
