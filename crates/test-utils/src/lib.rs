//! Shared test utilities for the map-poster workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Font and theme path helpers
//! - Skip macros for optional fonts
//! - Feature generators
//! - Common bounding boxes and themes
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_font, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if no usable TrueType font is installed.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_font;
///
/// #[test]
/// fn test_title_is_drawn() {
///     let path = require_font!();
///     // Test code using path...
/// }
/// ```
///
/// If no font is found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: No TrueType font found. Install fonts-dejavu or set FONTS_DIR.");
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting that an RGB(A) pixel is within `tolerance` of an expected
/// color on every RGB channel.
///
/// ```ignore
/// use test_utils::assert_pixel_near;
///
/// assert_pixel_near!([10, 10, 11, 255], [10, 10, 10], 2);
/// ```
#[macro_export]
macro_rules! assert_pixel_near {
    ($pixel:expr, $expected:expr, $tolerance:expr) => {{
        let pixel = $pixel;
        let expected = $expected;
        let tolerance: i32 = $tolerance as i32;
        for channel in 0..3 {
            let diff = (pixel[channel] as i32 - expected[channel] as i32).abs();
            if diff > tolerance {
                panic!(
                    "assertion failed: pixel {:?} differs from {:?} on channel {} by {} (> {})",
                    pixel, expected, channel, diff, tolerance
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_pixel_near_passes() {
        assert_pixel_near!([10u8, 12, 8, 255], [10u8, 10, 10], 2);
    }

    #[test]
    #[should_panic(expected = "channel 2")]
    fn test_assert_pixel_near_fails() {
        assert_pixel_near!([10u8, 10, 20, 255], [10u8, 10, 10], 2);
    }
}
