//! Common types shared across the map poster crates and services.

pub mod bbox;
pub mod error;
pub mod feature;
pub mod theme;

pub use bbox::{BoundingBox, METERS_PER_DEGREE};
pub use error::{PosterError, PosterResult};
pub use feature::{Area, FeatureSet, GeoPoint, Road, RoadTier, Tags, Way};
pub use theme::{resolve_theme, Color, Theme, ThemeDirectory, ThemeSource, DEFAULT_THEME_NAME};
