use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{UpstreamError, WeatherRecord, provider::get_json};

use super::{REQUEST_TIMEOUT, WeatherSource, http_client};

pub const DEFAULT_BASE_URL: &str = "https://dataservice.accuweather.com";

/// Longest daily forecast the API serves.
pub const MAX_FORECAST_DAYS: usize = 5;

const LOCATION_SEARCH: &str = "AccuWeather location search";
const CURRENT_CONDITIONS: &str = "AccuWeather current conditions";
const DAILY_FORECAST: &str = "AccuWeather daily forecast";

/// Primary provider. Every query is a two-step lookup: free-text location to
/// location key, then conditions or forecast by key.
#[derive(Debug, Clone)]
pub struct AccuWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl AccuWeatherProvider {
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

    async fn lookup_location_key(&self, location: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/locations/v1/cities/search", self.base_url);

        let locations: Vec<AwLocation> = get_json(
            &self.http,
            &url,
            &[("apikey", self.api_key.as_str()), ("q", location)],
            LOCATION_SEARCH,
            location,
        )
        .await?;

        locations.into_iter().next().map(|l| l.key).ok_or_else(|| UpstreamError::LocationNotFound {
            endpoint: LOCATION_SEARCH,
            location: location.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwLocation {
    key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwValue {
    #[serde(default)]
    value: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwMeasure {
    #[serde(default)]
    metric: AwValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDirection {
    #[serde(default)]
    localized: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwCurrentWind {
    #[serde(default)]
    speed: AwMeasure,
    #[serde(default)]
    direction: AwDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwCurrentConditions {
    weather_text: String,
    temperature: AwMeasure,
    #[serde(default)]
    real_feel_temperature: AwMeasure,
    #[serde(default)]
    relative_humidity: Option<f64>,
    #[serde(default)]
    wind: AwCurrentWind,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwRange {
    #[serde(default)]
    maximum: AwValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwForecastWind {
    #[serde(default)]
    speed: AwValue,
    #[serde(default)]
    direction: AwDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDayPart {
    icon_phrase: String,
    #[serde(default)]
    precipitation_probability: f64,
    #[serde(default)]
    wind: AwForecastWind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDailyForecast {
    temperature: AwRange,
    #[serde(default)]
    real_feel_temperature: AwRange,
    day: AwDayPart,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwForecastResponse {
    daily_forecasts: Vec<AwDailyForecast>,
}

impl From<AwCurrentConditions> for WeatherRecord {
    fn from(c: AwCurrentConditions) -> Self {
        WeatherRecord {
            description: c.weather_text,
            temperature: c.temperature.metric.value,
            feels_like: c.real_feel_temperature.metric.value,
            humidity: c.relative_humidity.unwrap_or_default(),
            wind_speed: c.wind.speed.metric.value,
            wind_direction: c.wind.direction.localized,
        }
    }
}

impl From<AwDailyForecast> for WeatherRecord {
    fn from(fc: AwDailyForecast) -> Self {
        WeatherRecord {
            description: fc.day.icon_phrase,
            temperature: fc.temperature.maximum.value,
            feels_like: fc.real_feel_temperature.maximum.value,
            // Daily forecasts carry precipitation probability in the humidity slot.
            humidity: fc.day.precipitation_probability,
            wind_speed: fc.day.wind.speed.value,
            wind_direction: fc.day.wind.direction.localized,
        }
    }
}

#[async_trait]
impl WeatherSource for AccuWeatherProvider {
    async fn current(&self, location: &str) -> Result<WeatherRecord, UpstreamError> {
        let key = self.lookup_location_key(location).await?;
        let url = format!("{}/currentconditions/v1/{}", self.base_url, key);

        let conditions: Vec<AwCurrentConditions> = get_json(
            &self.http,
            &url,
            &[("apikey", self.api_key.as_str()), ("details", "true")],
            CURRENT_CONDITIONS,
            location,
        )
        .await?;

        conditions.into_iter().next().map(WeatherRecord::from).ok_or_else(|| {
            UpstreamError::NoData {
                endpoint: CURRENT_CONDITIONS,
                location: location.to_string(),
            }
        })
    }

    async fn forecast(
        &self,
        location: &str,
        days: usize,
    ) -> Result<Vec<WeatherRecord>, UpstreamError> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let key = self.lookup_location_key(location).await?;

        let request_days = days.min(MAX_FORECAST_DAYS);
        // The API only serves 1-day and 5-day products below the paid tiers.
        let product = if request_days == 1 { "1day" } else { "5day" };
        let url = format!("{}/forecasts/v1/daily/{}/{}", self.base_url, product, key);

        let parsed: AwForecastResponse = get_json(
            &self.http,
            &url,
            &[("apikey", self.api_key.as_str()), ("metric", "true"), ("details", "true")],
            DAILY_FORECAST,
            location,
        )
        .await?;

        if parsed.daily_forecasts.is_empty() {
            return Err(UpstreamError::NoData {
                endpoint: DAILY_FORECAST,
                location: location.to_string(),
            });
        }

        let mut out: Vec<WeatherRecord> = parsed
            .daily_forecasts
            .into_iter()
            .take(request_days)
            .map(WeatherRecord::from)
            .collect();

        if out.len() < days {
            tracing::debug!(
                %location,
                returned = out.len(),
                requested = days,
                "padding forecast beyond provider horizon"
            );
            out.resize_with(days, WeatherRecord::unavailable);
        }

        Ok(out)
    }
}
