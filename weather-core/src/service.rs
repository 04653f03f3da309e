use std::io::{self, Stdout, Write};

use crate::{
    UpstreamError, WeatherSource,
    model::{ForecastSpan, User},
    render,
};

/// Orchestrates a weather view: picks the query shape from the user's
/// preferences, calls the active source and renders the result.
///
/// The source is chosen once by the caller and never swapped afterwards.
#[derive(Debug)]
pub struct WeatherService<W: Write> {
    source: Box<dyn WeatherSource>,
    out: W,
}

impl WeatherService<Stdout> {
    pub fn stdout(source: Box<dyn WeatherSource>) -> Self {
        Self::new(source, io::stdout())
    }
}

impl<W: Write> WeatherService<W> {
    pub fn new(source: Box<dyn WeatherSource>, out: W) -> Self {
        Self { source, out }
    }

    /// Give back the output sink, e.g. to inspect captured text.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Show the weather view configured in `user`'s preferences.
    ///
    /// Upstream failures are reported on the sink as `Error: ...`; only I/O
    /// errors on the sink itself are returned.
    pub async fn show_weather(&mut self, user: &User) -> io::Result<()> {
        let prefs = &user.preferences;
        let location = prefs.location.as_str();
        let unit = prefs.temperature_unit();
        let verbosity = prefs.verbosity_level();

        match prefs.forecast_span() {
            ForecastSpan::Day => match self.source.current(location).await {
                Ok(record) => {
                    render::render_detailed(&mut self.out, location, &record, verbosity, unit)
                }
                Err(e) => self.report(e),
            },
            span => {
                let label = prefs.forecast.trim().to_lowercase();
                match self.source.forecast(location, span.days()).await {
                    Ok(records) => render::render_forecast(
                        &mut self.out,
                        location,
                        &records,
                        verbosity,
                        unit,
                        &label,
                    ),
                    Err(e) => self.report(e),
                }
            }
        }
    }

    /// One-line current conditions for an arbitrary location, ignoring
    /// stored preferences.
    pub async fn show_other_location(&mut self, location: &str) -> io::Result<()> {
        let location = location.trim();
        if location.is_empty() {
            return writeln!(self.out, "No location entered.");
        }

        match self.source.current(location).await {
            Ok(record) => render::render_summary(&mut self.out, location, &record),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: UpstreamError) -> io::Result<()> {
        tracing::warn!(location = err.location(), error = %err, "weather lookup failed");
        writeln!(self.out, "Error: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Preferences, WeatherRecord};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Calls {
        current: Vec<String>,
        forecast: Vec<(String, usize)>,
    }

    #[derive(Debug, Default)]
    struct FakeSource {
        current: Option<WeatherRecord>,
        forecast: Vec<WeatherRecord>,
        fail: bool,
        calls: Arc<Mutex<Calls>>,
    }

    impl FakeSource {
        fn failure(location: &str) -> UpstreamError {
            UpstreamError::LocationNotFound {
                endpoint: "fake lookup",
                location: location.to_string(),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn current(&self, location: &str) -> Result<WeatherRecord, UpstreamError> {
            self.calls.lock().unwrap().current.push(location.to_string());
            if self.fail {
                return Err(Self::failure(location));
            }
            Ok(self.current.clone().unwrap_or_default())
        }

        async fn forecast(
            &self,
            location: &str,
            days: usize,
        ) -> Result<Vec<WeatherRecord>, UpstreamError> {
            self.calls.lock().unwrap().forecast.push((location.to_string(), days));
            if self.fail {
                return Err(Self::failure(location));
            }
            Ok(self.forecast.clone())
        }
    }

    fn user(location: &str, unit: &str, verbosity: &str, forecast: &str) -> User {
        User {
            user_id: "u1".into(),
            name: "Test".into(),
            password_hash: String::new(),
            preferences: Preferences {
                location: location.into(),
                unit: unit.into(),
                verbosity: verbosity.into(),
                forecast: forecast.into(),
            },
        }
    }

    fn record(description: &str, temperature: f64) -> WeatherRecord {
        WeatherRecord {
            description: description.into(),
            temperature,
            ..WeatherRecord::default()
        }
    }

    async fn run(source: FakeSource, u: &User) -> String {
        let mut service = WeatherService::new(Box::new(source), Vec::new());
        service.show_weather(u).await.unwrap();
        String::from_utf8(service.into_output()).unwrap()
    }

    #[tokio::test]
    async fn day_view_renders_detailed_verbose() {
        let source = FakeSource {
            current: Some(WeatherRecord {
                description: "Sunny".into(),
                temperature: 20.0,
                feels_like: 18.0,
                humidity: 65.0,
                wind_speed: 12.0,
                wind_direction: "NE".into(),
            }),
            ..FakeSource::default()
        };

        let out = run(source, &user("london", "celsius", "verbose", "day")).await;

        assert!(out.contains("Weather for London"));
        assert!(out.contains("Description : Sunny"));
        assert!(out.contains("Temperature : 20 °C"));
        assert!(out.contains("Feels Like  : 18 °C"));
        assert!(out.contains("Humidity    : 65%"));
        assert!(out.contains("Wind        : 12 km/h (NE)"));
    }

    #[tokio::test]
    async fn week_view_renders_brief_forecast() {
        let source = FakeSource {
            forecast: vec![record("Partly Cloudy", 15.0), record("Rainy", 12.0)],
            ..FakeSource::default()
        };

        let out = run(source, &user("london", "celsius", "brief", "week")).await;

        assert!(out.contains("Forecast for London (week)"));
        assert!(out.contains("Day 1: Partly Cloudy – 15°C"));
        assert!(out.contains("Day 2: Rainy – 12°C"));
        assert!(!out.contains("Feels like"));
    }

    #[tokio::test]
    async fn day_preference_makes_exactly_one_current_call() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let source = FakeSource { calls: calls.clone(), ..FakeSource::default() };

        run(source, &user("oslo", "celsius", "brief", "DAY")).await;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.current, vec!["oslo".to_string()]);
        assert!(calls.forecast.is_empty());
    }

    #[tokio::test]
    async fn forecast_day_counts_follow_preference() {
        for (pref, expected) in [("week", 7), ("month", 30), ("fortnight", 7), ("", 7)] {
            let calls = Arc::new(Mutex::new(Calls::default()));
            let source = FakeSource { calls: calls.clone(), ..FakeSource::default() };

            run(source, &user("oslo", "celsius", "brief", pref)).await;

            let calls = calls.lock().unwrap();
            assert!(calls.current.is_empty(), "{pref}");
            assert_eq!(calls.forecast, vec![("oslo".to_string(), expected)], "{pref}");
        }
    }

    #[tokio::test]
    async fn unrecognized_span_keeps_its_label() {
        let source = FakeSource {
            forecast: vec![record("Dry", 9.0)],
            ..FakeSource::default()
        };

        let out = run(source, &user("lima", "celsius", "brief", "fortnight")).await;

        assert!(out.contains("Forecast for Lima (fortnight)"));
    }

    #[tokio::test]
    async fn fahrenheit_applies_to_forecast_entries() {
        let source = FakeSource {
            forecast: vec![record("Hot", 35.0)],
            ..FakeSource::default()
        };

        let out = run(source, &user("dubai", "Fahrenheit", "brief", "week")).await;

        assert!(out.contains("Day 1: Hot – 95°F"));
    }

    #[tokio::test]
    async fn upstream_failure_writes_only_an_error_line() {
        for forecast in ["day", "week", "month"] {
            let source = FakeSource { fail: true, ..FakeSource::default() };

            let out = run(source, &user("atlantis", "celsius", "verbose", forecast)).await;

            assert_eq!(out, "Error: location not found: atlantis\n");
            assert!(!out.contains("Weather for"));
            assert!(!out.contains("Forecast for"));
        }
    }

    #[tokio::test]
    async fn other_location_prints_one_summary_line() {
        let source = FakeSource {
            current: Some(record("Cloudy", 18.0)),
            ..FakeSource::default()
        };
        let mut service = WeatherService::new(Box::new(source), Vec::new());

        service.show_other_location("paris").await.unwrap();

        let out = String::from_utf8(service.into_output()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("Location: Paris | Cloudy | 18°C"));
    }

    #[tokio::test]
    async fn other_location_ignores_unit_preference_and_blank_input() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let source = FakeSource {
            current: Some(record("Clear", 25.0)),
            calls: calls.clone(),
            ..FakeSource::default()
        };
        let mut service = WeatherService::new(Box::new(source), Vec::new());

        service.show_other_location("   ").await.unwrap();
        service.show_other_location("  new york ").await.unwrap();

        let out = String::from_utf8(service.into_output()).unwrap();
        assert_eq!(out, "No location entered.\nLocation: New York | Clear | 25°C\n");
        assert_eq!(calls.lock().unwrap().current, vec!["new york".to_string()]);
    }

    #[tokio::test]
    async fn other_location_failure_reports_error() {
        let source = FakeSource { fail: true, ..FakeSource::default() };
        let mut service = WeatherService::new(Box::new(source), Vec::new());

        service.show_other_location("nowhere").await.unwrap();

        let out = String::from_utf8(service.into_output()).unwrap();
        assert!(out.starts_with("Error: "));
        assert!(!out.contains("Location:"));
    }
}
