//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and forecast providers (Open-Meteo)
//! - The resolve-then-fetch pipeline and the query state it publishes
//! - Weather-code classification (icon, label, colour theme)
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod classify;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod provider;
pub mod query;
pub mod resolver;

pub use classify::{Classification, GradientKey, Severity, TimeOfDay, classify};
pub use config::Config;
pub use error::ErrorKind;
pub use fetcher::WeatherFetcher;
pub use model::{CurrentConditions, DailyEntry, DailyForecast, Location, WeatherReport};
pub use provider::{ForecastSource, Geocoder, providers_from_config};
pub use query::{Pipeline, QueryCoordinator, QueryState};
pub use resolver::Resolver;

/// Build a coordinator wired to the providers `config` describes.
pub fn coordinator_from_config(config: &Config) -> anyhow::Result<QueryCoordinator> {
    let (geocoder, source) = providers_from_config(config)?;
    Ok(QueryCoordinator::new(Pipeline::from_providers(geocoder, source)))
}
