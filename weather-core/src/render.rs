//! Text rendering of weather records.
//!
//! Every function writes to a caller-supplied sink so output can be captured.
//! Records are never mutated; unit conversion happens on the fly.

use std::io::{self, Write};

use crate::model::{TemperatureUnit, Verbosity, WeatherRecord};

/// Capitalize the first letter of every word, for display only.
///
/// A word starts after any character that is not alphanumeric or `_`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    out
}

/// Round to the nearest whole number, ties to even.
pub fn whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Temperature as displayed in `unit`.
pub fn to_display_temperature(celsius: f64, unit: TemperatureUnit) -> i64 {
    whole(unit.convert(celsius))
}

/// Single-day view.
pub fn render_detailed<W: Write>(
    out: &mut W,
    location: &str,
    record: &WeatherRecord,
    verbosity: Verbosity,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let label = unit.label();

    writeln!(out, "\n Weather for {}", title_case(location))?;
    writeln!(out, "------------------------")?;
    writeln!(out, "Description : {}", record.description)?;
    writeln!(out, "Temperature : {} {}", to_display_temperature(record.temperature, unit), label)?;

    if verbosity.is_verbose() {
        writeln!(out, "Feels Like  : {} {}", to_display_temperature(record.feels_like, unit), label)?;
        writeln!(out, "Humidity    : {}%", whole(record.humidity))?;
        writeln!(out, "Wind        : {} km/h ({})", whole(record.wind_speed), record.wind_direction)?;
    }

    Ok(())
}

/// Multi-day view, one numbered entry per record.
pub fn render_forecast<W: Write>(
    out: &mut W,
    location: &str,
    records: &[WeatherRecord],
    verbosity: Verbosity,
    unit: TemperatureUnit,
    period_label: &str,
) -> io::Result<()> {
    let label = unit.label();

    writeln!(out, "\n Forecast for {} ({})", title_case(location), period_label)?;
    writeln!(out, "----------------------------")?;

    for (i, record) in records.iter().enumerate() {
        writeln!(
            out,
            "Day {}: {} – {}{}",
            i + 1,
            record.description,
            to_display_temperature(record.temperature, unit),
            label
        )?;

        if verbosity.is_verbose() {
            writeln!(out, "  Feels like : {}{}", to_display_temperature(record.feels_like, unit), label)?;
            writeln!(out, "  Humidity   : {}%", whole(record.humidity))?;
            writeln!(out, "  Wind       : {} km/h", whole(record.wind_speed))?;
        }
    }

    Ok(())
}

/// Compact one-liner, always in Celsius.
pub fn render_summary<W: Write>(out: &mut W, location: &str, record: &WeatherRecord) -> io::Result<()> {
    writeln!(
        out,
        "Location: {} | {} | {}°C",
        title_case(location),
        record.description,
        whole(record.temperature)
    )
}
