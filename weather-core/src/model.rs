use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Number of days requested from the forecast endpoint and the maximum
/// length of a [`DailyForecast`].
pub const FORECAST_DAYS: usize = 7;

/// Best match for a place-name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// First-level administrative area (state, region, ...), when known.
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// "London, England, United Kingdom" style label.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty() && *r != self.name) {
            parts.push(region);
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kmh: f64,
    pub pressure_hpa: f64,
    pub visibility_km: f64,
    pub weather_code: i32,
    /// Reading time in the location's own timezone.
    pub observed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
}

/// Chronological daily summaries, at most [`FORECAST_DAYS`] long.
pub type DailyForecast = Vec<DailyEntry>;

/// Everything one successful query cycle produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    pub daily: DailyForecast,
    /// IANA name resolved by the provider, e.g. "Europe/London".
    pub timezone: String,
}
