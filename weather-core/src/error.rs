//! Error types shared across the core crate.

use thiserror::Error;

/// Any failure talking to an upstream weather API.
///
/// There is no retry and no distinction between transient and permanent
/// failures; every variant ends the request it belongs to.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{endpoint} request for '{location}' failed: {source}")]
    Transport {
        endpoint: &'static str,
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request for '{location}' failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        location: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse {endpoint} response for '{location}': {source}")]
    Decode {
        endpoint: &'static str,
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("location not found: {location}")]
    LocationNotFound { endpoint: &'static str, location: String },

    #[error("no {endpoint} data for {location}")]
    NoData { endpoint: &'static str, location: String },

    #[error("{endpoint} rejected the request for '{location}': {info}")]
    Rejected {
        endpoint: &'static str,
        location: String,
        info: String,
    },
}

impl UpstreamError {
    /// The location string the failed request was made for.
    pub fn location(&self) -> &str {
        match self {
            Self::Transport { location, .. }
            | Self::Status { location, .. }
            | Self::Decode { location, .. }
            | Self::LocationNotFound { location, .. }
            | Self::NoData { location, .. }
            | Self::Rejected { location, .. } => location,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("user store document is invalid: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("user '{0}' not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user id '{0}' is already registered")]
    UserExists(String),

    #[error("name '{0}' is already taken")]
    NameTaken(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_available_on_every_variant() {
        let err = UpstreamError::LocationNotFound {
            endpoint: "AccuWeather location search",
            location: "Atlantis".into(),
        };
        assert_eq!(err.location(), "Atlantis");
        assert_eq!(err.to_string(), "location not found: Atlantis");

        let err = UpstreamError::NoData {
            endpoint: "AccuWeather current conditions",
            location: "Oslo".into(),
        };
        assert_eq!(err.to_string(), "no AccuWeather current conditions data for Oslo");
    }

    #[test]
    fn store_error_converts_into_auth_error() {
        let err: AuthError = StoreError::NotFound("u1".into()).into();
        assert_eq!(err.to_string(), "user 'u1' not found");
    }
}
