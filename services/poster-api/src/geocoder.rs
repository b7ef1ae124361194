//! City name to coordinates lookup.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use poster_common::{GeoPoint, PosterError, PosterResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Resolves a city/country pair to a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the coordinates of `city, country`.
    ///
    /// Returns [`PosterError::GeocodeNotFound`] when the service has no match.
    async fn lookup(&self, city: &str, country: &str) -> PosterResult<GeoPoint>;
}

/// One search result from Nominatim. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Geocoder backed by the Nominatim search API.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn lookup(&self, city: &str, country: &str) -> PosterResult<GeoPoint> {
        let query = format!("{}, {}", city, country);
        let response = self
            .client
            .get(self.search_url())
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PosterError::GeocodeError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PosterError::GeocodeError(format!(
                "search returned {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| PosterError::GeocodeError(format!("invalid search response: {}", e)))?;

        let point = first_place(&places, &query)?;
        debug!(lat = point.lat, lon = point.lon, "Geocoded {}", query);
        Ok(point)
    }
}

/// Coordinates of the first search result.
pub fn first_place(places: &[NominatimPlace], query: &str) -> PosterResult<GeoPoint> {
    let place = places
        .first()
        .ok_or_else(|| PosterError::GeocodeNotFound(query.to_string()))?;

    let parse = |value: &str, field: &str| {
        value.trim().parse::<f64>().map_err(|_| {
            PosterError::GeocodeError(format!("result {} '{}' is not a number", field, value))
        })
    };
    Ok(GeoPoint::new(parse(&place.lat, "lat")?, parse(&place.lon, "lon")?))
}
