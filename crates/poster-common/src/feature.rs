//! Vector map features: raw upstream ways and the validated feature set
//! handed to the renderer.
//!
//! Upstream records arrive as loosely tagged [`Way`]s. [`FeatureSet::new`]
//! validates them once: short geometry is dropped, road tags are reduced to
//! a [`RoadTier`], and everything downstream works with typed [`Road`] and
//! [`Area`] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tag name to tag value, e.g. `highway=primary`.
pub type Tags = BTreeMap<String, String>;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// An ordered polyline or polygon boundary with tags, as delivered by the
/// feature provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Way {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
}

impl Way {
    pub fn new(geometry: Vec<GeoPoint>) -> Self {
        Self {
            id: 0,
            tags: Tags::new(),
            geometry,
        }
    }

    /// Builder-style tag insertion.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Road classification bucket determining stroke color and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadTier {
    Motorway,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Default,
}

impl RoadTier {
    /// All tiers, highest priority first.
    pub const ALL: [RoadTier; 6] = [
        RoadTier::Motorway,
        RoadTier::Primary,
        RoadTier::Secondary,
        RoadTier::Tertiary,
        RoadTier::Residential,
        RoadTier::Default,
    ];

    /// Classify a `highway` tag value. Matching is exact and case-sensitive.
    pub fn from_highway(highway: &str) -> Self {
        match highway {
            "motorway" | "motorway_link" => RoadTier::Motorway,
            "trunk" | "trunk_link" | "primary" | "primary_link" => RoadTier::Primary,
            "secondary" | "secondary_link" => RoadTier::Secondary,
            "tertiary" | "tertiary_link" => RoadTier::Tertiary,
            "residential" | "living_street" | "unclassified" => RoadTier::Residential,
            _ => RoadTier::Default,
        }
    }

    /// Classify from a full tag map; a missing `highway` tag is the default tier.
    pub fn from_tags(tags: &Tags) -> Self {
        tags.get("highway")
            .map(|h| Self::from_highway(h))
            .unwrap_or(RoadTier::Default)
    }
}

/// A validated linear road feature (at least two points).
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub tier: RoadTier,
    pub points: Vec<GeoPoint>,
}

/// A validated areal feature (at least three points).
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub points: Vec<GeoPoint>,
}

/// Minimum points for a line feature.
pub const MIN_LINE_POINTS: usize = 2;

/// Minimum points for an area feature.
pub const MIN_AREA_POINTS: usize = 3;

/// The three disjoint feature collections drawn on a poster.
///
/// Collection order is preserved; it is the drawing order within a layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub roads: Vec<Road>,
    pub water: Vec<Area>,
    pub parks: Vec<Area>,
}

impl FeatureSet {
    /// Validate raw ways into a feature set, dropping degenerate geometry.
    pub fn new(roads: Vec<Way>, water: Vec<Way>, parks: Vec<Way>) -> Self {
        let road_count = roads.len();
        let roads: Vec<Road> = roads
            .into_iter()
            .filter(|w| w.geometry.len() >= MIN_LINE_POINTS)
            .map(|w| Road {
                tier: RoadTier::from_tags(&w.tags),
                points: w.geometry,
            })
            .collect();

        let water_count = water.len();
        let water = Self::areas(water);
        let park_count = parks.len();
        let parks = Self::areas(parks);

        debug!(
            roads = roads.len(),
            roads_dropped = road_count - roads.len(),
            water = water.len(),
            water_dropped = water_count - water.len(),
            parks = parks.len(),
            parks_dropped = park_count - parks.len(),
            "Validated feature set"
        );

        Self {
            roads,
            water,
            parks,
        }
    }

    fn areas(ways: Vec<Way>) -> Vec<Area> {
        ways.into_iter()
            .filter(|w| w.geometry.len() >= MIN_AREA_POINTS)
            .map(|w| Area { points: w.geometry })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty() && self.water.is_empty() && self.parks.is_empty()
    }
}
