//! Core library for the `weather` terminal app.
//!
//! This crate defines:
//! - Shared domain models (weather records, users, preferences)
//! - Abstraction over upstream weather providers
//! - Text rendering and the weather view orchestration
//! - User storage, authentication and preference management
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod service;
pub mod store;

pub use config::{Config, ProviderConfig};
pub use error::{AuthError, StoreError, UpstreamError};
pub use model::{ForecastSpan, Preferences, TemperatureUnit, User, Verbosity, WeatherRecord};
pub use provider::{ProviderId, WeatherSource};
pub use service::WeatherService;
pub use store::{JsonFileStore, MemoryStore, UserStore};
