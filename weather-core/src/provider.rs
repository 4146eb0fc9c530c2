use crate::{
    Config,
    error::ErrorKind,
    model::{CurrentConditions, DailyForecast, Location},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

/// Place-name search backend.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Top-ranked match for `name`, or `None` when the search has no results.
    /// Issues exactly one request.
    async fn search(&self, name: &str) -> Result<Option<Location>, ErrorKind>;
}

/// Current + daily forecast backend.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// Issues exactly one request.
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, ErrorKind>;
}

/// Raw forecast payload before the fetcher applies its length cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: DailyForecast,
    pub timezone: String,
}

/// Build the geocoder and forecast source described by `config`.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn Geocoder>, Arc<dyn ForecastSource>)> {
    config.validate()?;
    let provider = Arc::new(OpenMeteoProvider::from_config(config)?);
    let geocoder: Arc<dyn Geocoder> = provider.clone();
    let forecast: Arc<dyn ForecastSource> = provider;
    Ok((geocoder, forecast))
}
