//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, PosterResult};

/// Meters per degree used for the flat-degree radius conversion.
///
/// This is the equatorial value applied at every latitude, so boxes at high
/// latitudes cover less ground east-west than north-south.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A geographic bounding box in decimal degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Square box of `radius_meters` around a center point.
    ///
    /// Uses `radius / 111320` degrees on both axes with no latitude
    /// correction.
    pub fn around(lat: f64, lon: f64, radius_meters: f64) -> Self {
        let radius_degrees = radius_meters / METERS_PER_DEGREE;
        Self {
            min_lat: lat - radius_degrees,
            max_lat: lat + radius_degrees,
            min_lon: lon - radius_degrees,
            max_lon: lon + radius_degrees,
        }
    }

    /// Reject boxes with zero, negative or non-finite extent.
    pub fn validate(&self) -> PosterResult<()> {
        let edges = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(PosterError::InvalidGeometry(format!(
                "bounding box has non-finite edge: {:?}",
                self
            )));
        }
        if self.min_lat >= self.max_lat {
            return Err(PosterError::InvalidGeometry(format!(
                "latitude extent must be positive (min_lat {} >= max_lat {})",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon >= self.max_lon {
            return Err(PosterError::InvalidGeometry(format!(
                "longitude extent must be positive (min_lon {} >= max_lon {})",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Overpass bbox filter: "south,west,north,east".
    pub fn overpass_filter(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_uses_flat_degree_radius() {
        let bbox = BoundingBox::around(10.0, 20.0, 111_320.0);
        assert!((bbox.min_lat - 9.0).abs() < 1e-12);
        assert!((bbox.max_lat - 11.0).abs() < 1e-12);
        assert!((bbox.min_lon - 19.0).abs() < 1e-12);
        assert!((bbox.max_lon - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(BoundingBox::new(1.0, 1.0, 0.0, 1.0).validate().is_err());
        assert!(BoundingBox::new(0.0, 1.0, 2.0, 1.0).validate().is_err());
        assert!(BoundingBox::new(0.0, f64::NAN, 0.0, 1.0).validate().is_err());
        assert!(BoundingBox::new(0.0, 1.0, 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_overpass_filter_order() {
        let bbox = BoundingBox::new(40.7, 40.72, -74.02, -74.0);
        assert_eq!(bbox.overpass_filter(), "40.7,-74.02,40.72,-74");
    }
}
