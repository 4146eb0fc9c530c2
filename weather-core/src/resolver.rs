use std::sync::Arc;

use tracing::debug;

use crate::{error::ErrorKind, model::Location, provider::Geocoder};

/// Turns free text into the best-matching [`Location`].
#[derive(Debug, Clone)]
pub struct Resolver {
    geocoder: Arc<dyn Geocoder>,
}

impl Resolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Blank input is rejected before any request is made.
    pub async fn resolve(&self, name: &str) -> Result<Location, ErrorKind> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ErrorKind::EmptyInput);
        }

        debug!("Geocoding location name: {}", name);

        let location = self
            .geocoder
            .search(name)
            .await?
            .ok_or_else(|| ErrorKind::NotFound {
                query: name.to_string(),
            })?;

        debug!(
            "Resolved location: {} at ({:.4}, {:.4})",
            location.name, location.latitude, location.longitude
        );

        Ok(location)
    }
}
