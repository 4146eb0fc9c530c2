use std::sync::Arc;

use tracing::debug;

use crate::{
    error::ErrorKind,
    model::{CurrentConditions, DailyForecast, FORECAST_DAYS},
    provider::{Forecast, ForecastSource},
};

/// Fetches current conditions and the daily outlook for a coordinate pair.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    source: Arc<dyn ForecastSource>,
}

impl WeatherFetcher {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Coordinates come from the resolver and are not re-validated.
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(CurrentConditions, DailyForecast), ErrorKind> {
        let (current, daily, _) = self.fetch_forecast(latitude, longitude).await?;
        Ok((current, daily))
    }

    /// Like [`fetch_weather`](Self::fetch_weather) but also returns the provider's timezone name.
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(CurrentConditions, DailyForecast, String), ErrorKind> {
        let Forecast {
            current,
            mut daily,
            timezone,
        } = self.source.forecast(latitude, longitude).await?;

        if daily.len() > FORECAST_DAYS {
            debug!(received = daily.len(), "truncating daily series");
            daily.truncate(FORECAST_DAYS);
        }

        Ok((current, daily, timezone))
    }
}
