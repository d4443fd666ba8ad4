//! Weather lookup against OpenWeatherMap, with a fixed fallback reading

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A point-in-time weather observation for a place.
///
/// Transient: recomputed on each need, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub rain_probability_pct: u8,
    /// False when this is the synthetic fallback reading
    pub is_live: bool,
}

impl WeatherReading {
    /// The fixed reading substituted when the live lookup fails
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            temperature_c: 22.0,
            description: "parcialmente nublado".to_string(),
            humidity_pct: 65,
            rain_probability_pct: 20,
            is_live: false,
        }
    }
}

/// Source of current weather conditions for a place.
///
/// Implementations must fail soft: any transport or parse problem degrades
/// to [`WeatherReading::fallback`] rather than surfacing an error.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch(&self, place: &str) -> WeatherReading;
}

/// Response from the OpenWeatherMap current-weather API
#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    #[serde(default)]
    clouds: OwmClouds,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmClouds {
    #[serde(default)]
    all: u8,
}

/// Weather client backed by the OpenWeatherMap current-weather endpoint.
///
/// Queries with metric units and Spanish descriptions. Cloud cover stands in
/// for rain probability, which the free tier does not expose directly.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client with a bounded request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    async fn fetch_live(&self, place: &str) -> crate::Result<WeatherReading> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "es"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::Weather(format!(
                "weather API error {status}: {body}"
            )));
        }

        let parsed: OwmResponse = response.json().await?;
        Ok(reading_from_response(parsed))
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn fetch(&self, place: &str) -> WeatherReading {
        match self.fetch_live(place).await {
            Ok(reading) => {
                tracing::debug!(
                    place = %place,
                    temperature = reading.temperature_c,
                    "live weather reading"
                );
                reading
            }
            Err(e) => {
                tracing::warn!(place = %place, error = %e, "weather lookup failed, using fallback");
                WeatherReading::fallback()
            }
        }
    }
}

/// Map the OpenWeatherMap payload into a live reading
fn reading_from_response(resp: OwmResponse) -> WeatherReading {
    let description = resp
        .weather
        .first()
        .map_or_else(|| "despejado".to_string(), |c| c.description.clone());

    WeatherReading {
        temperature_c: resp.main.temp,
        description,
        humidity_pct: resp.main.humidity,
        rain_probability_pct: resp.clouds.all,
        is_live: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_reading_values() {
        let reading = WeatherReading::fallback();
        assert!((reading.temperature_c - 22.0).abs() < f64::EPSILON);
        assert_eq!(reading.description, "parcialmente nublado");
        assert_eq!(reading.humidity_pct, 65);
        assert_eq!(reading.rain_probability_pct, 20);
        assert!(!reading.is_live);
    }

    #[test]
    fn test_reading_from_response() {
        let body = r#"{
            "main": { "temp": 28.3, "humidity": 40 },
            "weather": [ { "description": "soleado" } ],
            "clouds": { "all": 10 }
        }"#;

        let parsed: OwmResponse = serde_json::from_str(body).unwrap();
        let reading = reading_from_response(parsed);

        assert!((reading.temperature_c - 28.3).abs() < f64::EPSILON);
        assert_eq!(reading.description, "soleado");
        assert_eq!(reading.humidity_pct, 40);
        assert_eq!(reading.rain_probability_pct, 10);
        assert!(reading.is_live);
    }

    #[test]
    fn test_reading_without_clouds_block() {
        let body = r#"{
            "main": { "temp": 15.0, "humidity": 70 },
            "weather": [ { "description": "niebla" } ]
        }"#;

        let parsed: OwmResponse = serde_json::from_str(body).unwrap();
        let reading = reading_from_response(parsed);
        assert_eq!(reading.rain_probability_pct, 0);
    }
}
