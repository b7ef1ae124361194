//! Map feature retrieval from an Overpass API endpoint.
//!
//! Roads, water and parks are fetched with three concurrent queries over the
//! same bounding box. Roads are required; a failed water or parks query
//! degrades to an empty layer.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use poster_common::{BoundingBox, FeatureSet, GeoPoint, PosterError, PosterResult, Way};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Highway values requested for the road layer.
pub const ROAD_HIGHWAYS: &[&str] = &[
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "residential",
    "living_street",
    "unclassified",
    "service",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
];

/// Features and the box they were fetched for.
#[derive(Debug, Clone)]
pub struct FetchedFeatures {
    pub features: FeatureSet,
    pub bounds: BoundingBox,
}

/// Supplies the map features around a point.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Fetch roads, water and parks within `radius_m` meters of `center`.
    async fn fetch_features(&self, center: GeoPoint, radius_m: f64) -> PosterResult<FetchedFeatures>;
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    way: Way,
}

/// Overpass API client.
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    #[instrument(skip(self, query))]
    async fn fetch_ways(&self, layer: &'static str, query: String) -> PosterResult<Vec<Way>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await
            .map_err(|e| PosterError::FeatureFetch(format!("{} query: {}", layer, e)))?;

        if !response.status().is_success() {
            return Err(PosterError::FeatureFetch(format!(
                "{} query returned {}",
                layer,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PosterError::FeatureFetch(format!("{} query: {}", layer, e)))?;
        let ways = parse_ways(&body)?;
        debug!(layer, count = ways.len(), "Fetched ways");
        Ok(ways)
    }
}

#[async_trait]
impl FeatureProvider for OverpassClient {
    #[instrument(skip(self), fields(lat = center.lat, lon = center.lon))]
    async fn fetch_features(&self, center: GeoPoint, radius_m: f64) -> PosterResult<FetchedFeatures> {
        let bounds = BoundingBox::around(center.lat, center.lon, radius_m);
        bounds.validate()?;
        let start = Instant::now();

        let (roads, water, parks) = tokio::join!(
            self.fetch_ways("roads", roads_query(&bounds)),
            self.fetch_ways("water", water_query(&bounds)),
            self.fetch_ways("parks", parks_query(&bounds)),
        );

        let roads = roads?;
        let water = optional_layer("water", water);
        let parks = optional_layer("parks", parks);

        let features = FeatureSet::new(roads, water, parks);
        info!(
            roads = features.roads.len(),
            water = features.water.len(),
            parks = features.parks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched map features"
        );
        Ok(FetchedFeatures { features, bounds })
    }
}

fn optional_layer(layer: &str, result: PosterResult<Vec<Way>>) -> Vec<Way> {
    result.unwrap_or_else(|e| {
        warn!(layer, error = %e, "Optional layer unavailable, drawing without it");
        Vec::new()
    })
}

/// Parse an Overpass JSON response, keeping ways that carry geometry.
pub fn parse_ways(body: &str) -> PosterResult<Vec<Way>> {
    let response: OverpassResponse = serde_json::from_str(body)
        .map_err(|e| PosterError::FeatureFetch(format!("invalid Overpass response: {}", e)))?;

    Ok(response
        .elements
        .into_iter()
        .filter(|el| el.kind == "way" && !el.way.geometry.is_empty())
        .map(|el| el.way)
        .collect())
}

fn wrap_query(body: &str) -> String {
    format!("[out:json][timeout:60];\n(\n{});\nout geom;", body)
}

/// Query for all drawable roads inside `bounds`.
pub fn roads_query(bounds: &BoundingBox) -> String {
    wrap_query(&format!(
        "  way[\"highway\"~\"^({})\"]({});\n",
        ROAD_HIGHWAYS.join("|"),
        bounds.overpass_filter()
    ))
}

/// Query for lakes, ponds and riverbanks inside `bounds`.
pub fn water_query(bounds: &BoundingBox) -> String {
    let bbox = bounds.overpass_filter();
    wrap_query(&format!(
        "  way[\"natural\"=\"water\"]({bbox});\n  way[\"waterway\"=\"riverbank\"]({bbox});\n",
        bbox = bbox
    ))
}

/// Query for parks and grass inside `bounds`.
pub fn parks_query(bounds: &BoundingBox) -> String {
    let bbox = bounds.overpass_filter();
    wrap_query(&format!(
        "  way[\"leisure\"=\"park\"]({bbox});\n  way[\"landuse\"=\"grass\"]({bbox});\n",
        bbox = bbox
    ))
}
