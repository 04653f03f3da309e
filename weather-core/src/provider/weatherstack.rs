use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{UpstreamError, WeatherRecord, provider::get_json};

use super::{REQUEST_TIMEOUT, WeatherSource, http_client};

/// The free tier is only served over plain HTTP.
pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";

const CURRENT: &str = "Weatherstack current";

/// Secondary provider: one direct query for current conditions and no
/// real multi-day data.
#[derive(Debug, Clone)]
pub struct WeatherstackProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherstackProvider {
    pub fn new(api_key: &str, base_url: Option<&str>) -> reqwest::Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            http: http_client(REQUEST_TIMEOUT)?,
        })
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> reqwest::Result<Self> {
        self.http = http_client(timeout)?;
        Ok(self)
    }
}

/// Weatherstack reports API errors inside a 200 body.
#[derive(Debug, Deserialize)]
struct WsResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<WsError>,
    #[serde(default)]
    current: Option<WsCurrent>,
}

#[derive(Debug, Deserialize)]
struct WsError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    #[serde(default)]
    feelslike: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    wind_dir: String,
    #[serde(default)]
    weather_descriptions: Vec<String>,
}

impl From<WsCurrent> for WeatherRecord {
    fn from(c: WsCurrent) -> Self {
        let description = c
            .weather_descriptions
            .into_iter()
            .next()
            .unwrap_or_else(|| "Unknown".to_string());

        WeatherRecord {
            description,
            temperature: c.temperature,
            feels_like: c.feelslike,
            humidity: c.humidity,
            wind_speed: c.wind_speed,
            wind_direction: c.wind_dir,
        }
    }
}

/// Deterministic stand-in for a forecast. Day `i` (1-based) cycles the
/// temperature through `20 + i % 5` and feels-like through `20 + i % 3`.
pub fn synthetic_forecast(days: usize) -> Vec<WeatherRecord> {
    (1..=days)
        .map(|i| WeatherRecord {
            description: "Partly Cloudy".to_string(),
            temperature: 20.0 + (i % 5) as f64,
            feels_like: 20.0 + (i % 3) as f64,
            humidity: 70.0,
            wind_speed: 10.0,
            wind_direction: "NW".to_string(),
        })
        .collect()
}

#[async_trait]
impl WeatherSource for WeatherstackProvider {
    async fn current(&self, location: &str) -> Result<WeatherRecord, UpstreamError> {
        let url = format!("{}/current", self.base_url);

        let parsed: WsResponse = get_json(
            &self.http,
            &url,
            &[("access_key", self.api_key.as_str()), ("query", location)],
            CURRENT,
            location,
        )
        .await?;

        if parsed.success == Some(false) || parsed.error.is_some() {
            let info = parsed
                .error
                .map(|e| match (e.code, e.info) {
                    (Some(code), Some(info)) => format!("{info} (code {code})"),
                    (None, Some(info)) => info,
                    (Some(code), None) => format!("error code {code}"),
                    (None, None) => "unknown error".to_string(),
                })
                .unwrap_or_else(|| "unknown error".to_string());

            return Err(UpstreamError::Rejected {
                endpoint: CURRENT,
                location: location.to_string(),
                info,
            });
        }

        parsed.current.map(WeatherRecord::from).ok_or_else(|| UpstreamError::NoData {
            endpoint: CURRENT,
            location: location.to_string(),
        })
    }

    /// Synthetic: the free API has no forecast endpoint, so no request is made.
    async fn forecast(
        &self,
        location: &str,
        days: usize,
    ) -> Result<Vec<WeatherRecord>, UpstreamError> {
        tracing::debug!(%location, days, "weatherstack forecast is synthetic");
        Ok(synthetic_forecast(days))
    }
}
