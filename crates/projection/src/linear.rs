//! Linear (equirectangular, unprojected) mapping of a lat/lon box onto a
//! pixel canvas.
//!
//! ```text
//! x = (lon - min_lon) / (max_lon - min_lon) * width
//! y = height - (lat - min_lat) / (max_lat - min_lat) * height
//! ```
//!
//! Row 0 is the top of the raster while latitude grows northward, hence the
//! flipped y axis. There is no correction for longitude compression away
//! from the equator: the distortion is uniform across a city-sized box and
//! is accepted for poster output.

use poster_common::{BoundingBox, GeoPoint, PosterResult};

/// Project a point within `bounds` onto a `width` x `height` canvas.
///
/// `bounds` must have positive extent on both axes; see
/// [`BoundingBox::validate`]. Points outside the box map outside the canvas.
pub fn project(point: GeoPoint, bounds: &BoundingBox, width: f64, height: f64) -> (f64, f64) {
    let x = (point.lon - bounds.min_lon) / (bounds.max_lon - bounds.min_lon) * width;
    let y = height - (point.lat - bounds.min_lat) / (bounds.max_lat - bounds.min_lat) * height;
    (x, y)
}

/// A projector bound to one validated bounding box and canvas size.
#[derive(Debug, Clone, Copy)]
pub struct LinearProjector {
    bounds: BoundingBox,
    width: f64,
    height: f64,
}

impl LinearProjector {
    /// Create a projector, rejecting degenerate bounding boxes.
    pub fn new(bounds: BoundingBox, width: u32, height: u32) -> PosterResult<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            width: width as f64,
            height: height as f64,
        })
    }

    /// Pixel coordinate for a point, in f32 for the raster backend.
    pub fn project(&self, point: GeoPoint) -> (f32, f32) {
        let (x, y) = project(point, &self.bounds, self.width, self.height);
        (x as f32, y as f32)
    }

    /// Pixel coordinate for a point in full precision.
    pub fn project_f64(&self, point: GeoPoint) -> (f64, f64) {
        project(point, &self.bounds, self.width, self.height)
    }
}
