//! Common test fixtures for map-poster tests.
//!
//! Bounding boxes, themes and small feature sets representing the
//! scenarios the renderer and service are tested against.

use poster_common::{BoundingBox, FeatureSet, GeoPoint, RoadTier, Way};

/// Common bounding box definitions for testing.
pub mod bbox {
    use poster_common::BoundingBox;

    /// Lower Manhattan, roughly 2.2 km square.
    pub const NYC: BoundingBox = BoundingBox {
        min_lat: 40.70,
        max_lat: 40.72,
        min_lon: -74.02,
        max_lon: -74.00,
    };

    /// Unit box at the origin, convenient for hand-computed pixel positions.
    pub const UNIT: BoundingBox = BoundingBox {
        min_lat: 0.0,
        max_lat: 1.0,
        min_lon: 0.0,
        max_lon: 1.0,
    };

    /// Zero-height box (min_lat == max_lat).
    pub const FLAT: BoundingBox = BoundingBox {
        min_lat: 40.71,
        max_lat: 40.71,
        min_lon: -74.02,
        max_lon: -74.00,
    };

    /// Inverted longitudes.
    pub const INVERTED: BoundingBox = BoundingBox {
        min_lat: 40.70,
        max_lat: 40.72,
        min_lon: -74.00,
        max_lon: -74.02,
    };
}

/// Common city coordinates for testing.
pub mod coords {
    use poster_common::GeoPoint;

    pub const PARIS: GeoPoint = GeoPoint {
        lat: 48.8566,
        lon: 2.3522,
    };

    pub const NEW_YORK: GeoPoint = GeoPoint {
        lat: 40.7128,
        lon: -74.0060,
    };

    pub const SYDNEY: GeoPoint = GeoPoint {
        lat: -33.8688,
        lon: 151.2093,
    };
}

/// Stored theme documents for testing.
pub mod themes {
    /// A complete dark theme.
    pub const NOIR: &str = r##"{
        "name": "Noir",
        "description": "Pure black background with white roads",
        "bg": "#000000",
        "text": "#FFFFFF",
        "gradient_color": "#000000",
        "water": "#0A0A0A",
        "parks": "#111111",
        "road_motorway": "#FFFFFF",
        "road_primary": "#E0E0E0",
        "road_secondary": "#C0C0C0",
        "road_tertiary": "#A0A0A0",
        "road_residential": "#808080",
        "road_default": "#A0A0A0"
    }"##;

    /// Missing `road_default`.
    pub const MISSING_FIELD: &str = r##"{
        "name": "Broken",
        "bg": "#000000",
        "text": "#FFFFFF",
        "gradient_color": "#000000",
        "water": "#0A0A0A",
        "parks": "#111111",
        "road_motorway": "#FFFFFF",
        "road_primary": "#E0E0E0",
        "road_secondary": "#C0C0C0",
        "road_tertiary": "#A0A0A0",
        "road_residential": "#808080"
    }"##;

    /// `bg` is not a hex color.
    pub const BAD_COLOR: &str = r##"{
        "name": "Broken",
        "bg": "black",
        "text": "#FFFFFF",
        "gradient_color": "#000000",
        "water": "#0A0A0A",
        "parks": "#111111",
        "road_motorway": "#FFFFFF",
        "road_primary": "#E0E0E0",
        "road_secondary": "#C0C0C0",
        "road_tertiary": "#A0A0A0",
        "road_residential": "#808080",
        "road_default": "#A0A0A0"
    }"##;
}

/// Every `highway` value the classifier maps to a named tier.
pub const CLASSIFIED_HIGHWAYS: &[(&str, RoadTier)] = &[
    ("motorway", RoadTier::Motorway),
    ("motorway_link", RoadTier::Motorway),
    ("trunk", RoadTier::Primary),
    ("trunk_link", RoadTier::Primary),
    ("primary", RoadTier::Primary),
    ("primary_link", RoadTier::Primary),
    ("secondary", RoadTier::Secondary),
    ("secondary_link", RoadTier::Secondary),
    ("tertiary", RoadTier::Tertiary),
    ("tertiary_link", RoadTier::Tertiary),
    ("residential", RoadTier::Residential),
    ("living_street", RoadTier::Residential),
    ("unclassified", RoadTier::Residential),
];

/// A single motorway running from the south-west to the north-east corner
/// of `bounds`.
pub fn diagonal_motorway(bounds: &BoundingBox) -> FeatureSet {
    let road = Way::new(vec![
        GeoPoint::new(bounds.min_lat, bounds.min_lon),
        GeoPoint::new(bounds.max_lat, bounds.max_lon),
    ])
    .with_tag("highway", "motorway");
    FeatureSet::new(vec![road], Vec::new(), Vec::new())
}

/// A closed rectangle covering the given fraction range of `bounds` on
/// both axes.
pub fn rectangle(bounds: &BoundingBox, from: f64, to: f64) -> Way {
    let lat = |t: f64| bounds.min_lat + bounds.height() * t;
    let lon = |t: f64| bounds.min_lon + bounds.width() * t;
    Way::new(vec![
        GeoPoint::new(lat(from), lon(from)),
        GeoPoint::new(lat(from), lon(to)),
        GeoPoint::new(lat(to), lon(to)),
        GeoPoint::new(lat(to), lon(from)),
        GeoPoint::new(lat(from), lon(from)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_boxes() {
        assert!(bbox::NYC.validate().is_ok());
        assert!(bbox::UNIT.validate().is_ok());
        assert!(bbox::FLAT.validate().is_err());
        assert!(bbox::INVERTED.validate().is_err());
    }

    #[test]
    fn test_theme_fixtures_are_json() {
        for doc in [themes::NOIR, themes::MISSING_FIELD, themes::BAD_COLOR] {
            assert!(serde_json::from_str::<serde_json::Value>(doc).is_ok());
        }
    }

    #[test]
    fn test_diagonal_motorway() {
        let features = diagonal_motorway(&bbox::NYC);
        assert_eq!(features.roads.len(), 1);
        assert!(features.water.is_empty());
        assert!(features.parks.is_empty());
    }
}
