//! Geographic to pixel coordinate transformations.
//!
//! Posters cover city-scale extents, so a plain linear mapping of degrees
//! onto the canvas is used instead of a conformal projection.

pub mod linear;

pub use linear::{project, LinearProjector};
