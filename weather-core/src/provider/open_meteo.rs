use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    Config,
    error::ErrorKind,
    model::{CurrentConditions, DailyEntry, FORECAST_DAYS, Location},
};

use super::{Forecast, ForecastSource, Geocoder};

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
wind_speed_10m,surface_pressure,visibility,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";
const CURRENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Open-Meteo geocoding + forecast client. Needs no API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            language: config.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, ErrorKind> {
        debug!(url, what, "sending request");

        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            warn!(what, error = %e, "request failed");
            ErrorKind::network(format!("Failed to send {what} request: {e}"))
        })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ErrorKind::network(format!("Failed to read {what} response body: {e}")))?;

        if !status.is_success() {
            warn!(what, %status, "non-success status");
            return Err(ErrorKind::network(format!(
                "{what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ErrorKind::network(format!("Failed to parse {what} JSON: {e}")))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    async fn search(&self, name: &str) -> Result<Option<Location>, ErrorKind> {
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let parsed: OmGeocodingResponse = self
            .get_json(&self.geocoding_url, &query, "geocoding")
            .await?;

        Ok(parsed.results.into_iter().next().map(Location::from))
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoProvider {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, ErrorKind> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("wind_speed_unit", "kmh".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ];

        let parsed: OmForecastResponse = self
            .get_json(&self.forecast_url, &query, "forecast")
            .await?;

        parsed.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    /// Absent entirely when nothing matched.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    country: Option<String>,
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<OmPlace> for Location {
    fn from(place: OmPlace) -> Self {
        Location {
            name: place.name,
            country: place.country.unwrap_or_default(),
            region: place.admin1,
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    surface_pressure: f64,
    /// Metres.
    visibility: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<NaiveDate>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    timezone: String,
    current: OmCurrent,
    daily: OmDaily,
}

impl TryFrom<OmForecastResponse> for Forecast {
    type Error = ErrorKind;

    fn try_from(res: OmForecastResponse) -> Result<Self, Self::Error> {
        let c = res.current;
        let observed_at = NaiveDateTime::parse_from_str(&c.time, CURRENT_TIME_FORMAT)
            .map_err(|e| ErrorKind::network(format!("Invalid current time '{}': {e}", c.time)))?;

        let current = CurrentConditions {
            temperature_c: c.temperature_2m,
            feels_like_c: c.apparent_temperature,
            humidity_pct: c.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            wind_kmh: c.wind_speed_10m,
            pressure_hpa: c.surface_pressure,
            visibility_km: c.visibility / 1000.0,
            weather_code: c.weather_code,
            observed_at,
        };

        let d = res.daily;
        let len = d.time.len();
        if d.weather_code.len() != len
            || d.temperature_2m_max.len() != len
            || d.temperature_2m_min.len() != len
        {
            return Err(ErrorKind::network(format!(
                "Daily series lengths differ: time={len}, weather_code={}, max={}, min={}",
                d.weather_code.len(),
                d.temperature_2m_max.len(),
                d.temperature_2m_min.len(),
            )));
        }

        let daily = d
            .time
            .into_iter()
            .zip(d.weather_code)
            .zip(d.temperature_2m_max.into_iter().zip(d.temperature_2m_min))
            .map(|((date, weather_code), (temp_max_c, temp_min_c))| DailyEntry {
                date,
                weather_code,
                temp_max_c,
                temp_min_c,
            })
            .collect();

        Ok(Forecast {
            current,
            daily,
            timezone: res.timezone,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
