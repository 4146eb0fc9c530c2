use std::fmt::Write;

use chrono::Timelike;
use weather_core::{ErrorKind, WeatherReport, classify, classify::describe};

pub const LOADING: &str = "⏳ Fetching weather...";

pub fn welcome() -> String {
    "☁️  Weather\nEnter a city name to see the weather.".to_string()
}

pub fn failure(kind: &ErrorKind) -> String {
    format!("⚠️  {}", kind.user_message())
}

pub fn report(report: &WeatherReport) -> String {
    let current = &report.current;
    let look = classify(current.weather_code, current.observed_at.hour());
    let (from, to) = look.gradient.stops();

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}  {}", look.icon, report.location.display_name());
    let _ = writeln!(out, "   theme {} ({from} → {to})", look.gradient.name());
    let _ = writeln!(
        out,
        "   {:.1}°C  {}",
        current.temperature_c, look.description
    );
    let _ = writeln!(
        out,
        "   Feels like {:.1}°C · Humidity {}% · Wind {:.1} km/h",
        current.feels_like_c, current.humidity_pct, current.wind_kmh
    );
    let _ = writeln!(
        out,
        "   Pressure {:.0} hPa · Visibility {:.1} km",
        current.pressure_hpa, current.visibility_km
    );
    let _ = write!(
        out,
        "   Local time {}",
        current.observed_at.format("%Y-%m-%d %H:%M")
    );
    if !report.timezone.is_empty() {
        let _ = write!(out, " ({})", report.timezone);
    }
    out.push('\n');

    if !report.daily.is_empty() {
        let _ = writeln!(out, "\n   {}-day forecast", report.daily.len());
        for day in &report.daily {
            let condition = describe(day.weather_code);
            let _ = writeln!(
                out,
                "   {}  {}  {:<30} {:>5.1}° / {:>5.1}°",
                day.date.format("%a %d %b"),
                condition.icon,
                condition.description,
                day.temp_max_c,
                day.temp_min_c
            );
        }
    }

    out
}
