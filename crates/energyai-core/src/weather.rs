//! Weather collaborator client
//!
//! Thin reqwest client for an OpenWeatherMap-style API. Weather is optional
//! input to the analytics pipeline, so failures never propagate: `current()`
//! degrades to a fixed fallback reading and `forecast()` to an empty list.
//!
//! # Configuration
//!
//! - `WEATHER_API_KEY`: API key (required to enable the client)
//! - `WEATHER_API_URL`: base URL (default `https://api.openweathermap.org/data/2.5`)
//! - `WEATHER_LAT` / `WEATHER_LON`: location (default New York City)

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

// New York City, matching the original deployment's default location
const DEFAULT_LAT: f64 = 40.7128;
const DEFAULT_LON: f64 = -74.0060;

/// A current weather reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// °C
    pub temperature: f64,
    /// Percent relative humidity
    pub humidity: i64,
    /// m/s
    pub wind_speed: f64,
    pub description: String,
    /// hPa
    pub pressure: i64,
}

impl CurrentWeather {
    /// Fixed reading used when the collaborator is unreachable
    pub fn fallback() -> Self {
        Self {
            temperature: 22.0,
            humidity: 60,
            wind_speed: 5.0,
            description: "partly cloudy".to_string(),
            pressure: 1013,
        }
    }
}

/// One 3-hourly forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub description: String,
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    lat: f64,
    lon: f64,
}

impl WeatherClient {
    /// Create a new client against a base URL
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            lat: DEFAULT_LAT,
            lon: DEFAULT_LON,
        }
    }

    /// Override the location
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    /// Create from environment variables
    ///
    /// Returns None when `WEATHER_API_KEY` is not set; callers then fall back
    /// to [`CurrentWeather::fallback`] directly.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("WEATHER_API_KEY").ok()?;
        let base_url =
            std::env::var("WEATHER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut client = Self::new(&base_url, &api_key);
        if let (Ok(lat), Ok(lon)) = (std::env::var("WEATHER_LAT"), std::env::var("WEATHER_LON")) {
            if let (Ok(lat), Ok(lon)) = (lat.parse(), lon.parse()) {
                client = client.with_location(lat, lon);
            }
        }
        Some(client)
    }

    /// Base URL (for logging)
    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// Current conditions, degrading to the fixed fallback on any failure
    pub async fn current(&self) -> CurrentWeather {
        match self.fetch_current().await {
            Ok(weather) => weather,
            Err(e) => {
                warn!(error = %e, "Weather lookup failed, using fallback reading");
                CurrentWeather::fallback()
            }
        }
    }

    /// Upcoming 3-hourly entries covering `days` days; empty on failure
    pub async fn forecast(&self, days: usize) -> Vec<ForecastEntry> {
        match self.fetch_forecast(days).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Forecast lookup failed");
                Vec::new()
            }
        }
    }

    /// Check whether the API answers for the configured location
    pub async fn health_check(&self) -> bool {
        self.fetch_current().await.is_ok()
    }

    async fn fetch_current(&self) -> crate::Result<CurrentWeather> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, self.lat, self.lon, self.api_key
        );

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::Http(response.error_for_status().unwrap_err()));
        }

        let body: OwmCurrentResponse = response.json().await?;
        debug!(?body, "Weather response");

        Ok(body.into_weather())
    }

    async fn fetch_forecast(&self, days: usize) -> crate::Result<Vec<ForecastEntry>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, self.lat, self.lon, self.api_key
        );

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::Http(response.error_for_status().unwrap_err()));
        }

        let body: OwmForecastResponse = response.json().await?;

        // The API answers in 3-hour steps, eight per day
        let entries = body
            .list
            .into_iter()
            .take(days * 8)
            .map(|item| ForecastEntry {
                date: DateTime::from_timestamp(item.dt, 0).unwrap_or_else(Utc::now),
                temperature: item.main.temp.unwrap_or(25.0),
                humidity: item.main.humidity.unwrap_or(60),
                wind_speed: item.wind.speed.unwrap_or(5.0),
                description: item
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_else(|| "clear sky".to_string()),
            })
            .collect();

        Ok(entries)
    }
}

// Wire types for the OpenWeatherMap API. Every field is optional because the
// free tier omits sections under load; missing values take the same defaults
// the original service used.

#[derive(Debug, Default, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<i64>,
    pressure: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmDescription {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    weather: Vec<OwmDescription>,
}

impl OwmCurrentResponse {
    fn into_weather(self) -> CurrentWeather {
        CurrentWeather {
            temperature: self.main.temp.unwrap_or(25.0),
            humidity: self.main.humidity.unwrap_or(60),
            wind_speed: self.wind.speed.unwrap_or(5.0),
            description: self
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "clear sky".to_string()),
            pressure: self.main.pressure.unwrap_or(1013),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    #[serde(default)]
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    weather: Vec<OwmDescription>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    #[serde(default)]
    list: Vec<OwmForecastItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(CurrentWeather::fallback(), CurrentWeather::fallback());
        assert_eq!(CurrentWeather::fallback().temperature, 22.0);
    }

    #[test]
    fn test_current_response_defaults() {
        let body: OwmCurrentResponse = serde_json::from_str("{}").unwrap();
        let weather = body.into_weather();
        assert_eq!(weather.temperature, 25.0);
        assert_eq!(weather.description, "clear sky");
        assert_eq!(weather.pressure, 1013);
    }

    #[test]
    fn test_current_response_parses() {
        let json = r#"{
            "main": {"temp": 31.4, "humidity": 70, "pressure": 1008},
            "wind": {"speed": 3.6},
            "weather": [{"description": "light rain"}]
        }"#;
        let body: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        let weather = body.into_weather();
        assert_eq!(weather.temperature, 31.4);
        assert_eq!(weather.humidity, 70);
        assert_eq!(weather.description, "light rain");
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back() {
        let client = WeatherClient::new("http://127.0.0.1:1/nowhere", "demo_key");
        let weather = client.current().await;
        assert_eq!(weather, CurrentWeather::fallback());
        assert!(client.forecast(5).await.is_empty());
    }
}
