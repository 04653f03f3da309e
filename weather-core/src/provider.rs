use crate::{
    Config, UpstreamError, WeatherRecord,
    provider::{accuweather::AccuWeatherProvider, weatherstack::WeatherstackProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod accuweather;
pub mod weatherstack;

/// Upper bound for a single upstream round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    AccuWeather,
    Weatherstack,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::AccuWeather => "accuweather",
            ProviderId::Weatherstack => "weatherstack",
        }
    }

    /// Environment variable consulted when no key is stored in the config file.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::AccuWeather => "ACCUWEATHER_API_KEY",
            ProviderId::Weatherstack => "WEATHERSTACK_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::AccuWeather, ProviderId::Weatherstack]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "accuweather" => Ok(ProviderId::AccuWeather),
            "weatherstack" => Ok(ProviderId::Weatherstack),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: accuweather, weatherstack."
            )),
        }
    }
}

/// A source of normalized weather data.
///
/// Implementations own all upstream-specific lookup and parsing.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Present conditions for `location`.
    async fn current(&self, location: &str) -> Result<WeatherRecord, UpstreamError>;

    /// Daily outlook for `location`. The result always holds exactly `days` records.
    async fn forecast(&self, location: &str, days: usize)
    -> Result<Vec<WeatherRecord>, UpstreamError>;
}

/// Construct a source from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather configure {id}` or set {}.",
            id.api_key_env()
        )
    })?;
    let base_url = config.provider_base_url(id);

    let boxed: Box<dyn WeatherSource> = match id {
        ProviderId::AccuWeather => Box::new(AccuWeatherProvider::new(&api_key, base_url)?),
        ProviderId::Weatherstack => Box::new(WeatherstackProvider::new(&api_key, base_url)?),
    };

    tracing::debug!(provider = %id, "weather source initialized");
    Ok(boxed)
}

/// Construct the default source from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Issue a GET and decode the JSON body, mapping every failure to [`UpstreamError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    endpoint: &'static str,
    location: &str,
) -> Result<T, UpstreamError> {
    tracing::debug!(%endpoint, %location, "upstream request");

    let transport = |source| UpstreamError::Transport {
        endpoint,
        location: location.to_string(),
        source,
    };

    let res = http.get(url).query(query).send().await.map_err(transport)?;

    let status = res.status();
    let body = res.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            endpoint,
            location: location.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| UpstreamError::Decode {
        endpoint,
        location: location.to_string(),
        source,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
