use serde::{Deserialize, Serialize};

/// Normalized weather snapshot produced by every [`WeatherSource`](crate::WeatherSource).
///
/// Temperatures are always Celsius and wind speed is km/h. Conversion to other
/// units happens at render time only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub description: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent.
    ///
    /// Known defect: AccuWeather daily forecast records put the precipitation
    /// probability here instead of humidity.
    pub humidity: f64,
    pub wind_speed: f64,
    /// Compass label or localized text; may be empty.
    pub wind_direction: String,
}

impl WeatherRecord {
    pub const UNAVAILABLE: &'static str = "Forecast unavailable";

    /// Placeholder used to pad forecasts past the provider's horizon.
    pub fn unavailable() -> Self {
        Self { description: Self::UNAVAILABLE.to_string(), ..Self::default() }
    }
}

/// A user's weather settings, stored verbatim as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub location: String,
    pub unit: String,
    pub verbosity: String,
    pub forecast: String,
}

impl Preferences {
    /// Preferences count as unset until a location has been entered.
    pub fn is_empty(&self) -> bool {
        self.location.trim().is_empty()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_pref(&self.unit)
    }

    pub fn verbosity_level(&self) -> Verbosity {
        Verbosity::from_pref(&self.verbosity)
    }

    pub fn forecast_span(&self) -> ForecastSpan {
        ForecastSpan::from_pref(&self.forecast)
    }
}

/// Stored user document, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    /// Argon2 PHC string, never the plain password.
    pub password_hash: String,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Anything other than `fahrenheit` displays as Celsius.
    pub fn from_pref(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("fahrenheit") {
            Self::Fahrenheit
        } else {
            Self::Celsius
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Convert a canonical Celsius value into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Brief,
    Verbose,
}

impl Verbosity {
    pub fn from_pref(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("verbose") {
            Self::Verbose
        } else {
            Self::Brief
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Shape of the query issued for a user's weather view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSpan {
    Day,
    Week,
    Month,
}

impl ForecastSpan {
    /// `day` and `month` are recognized; everything else is a week.
    pub fn from_pref(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "day" => Self::Day,
            "month" => Self::Month,
            _ => Self::Week,
        }
    }

    /// Number of daily records requested for multi-day spans.
    pub fn days(&self) -> usize {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}
