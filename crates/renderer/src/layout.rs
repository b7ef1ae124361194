//! Poster text layout: what text goes where, independent of font loading.
//!
//! Positions are fractions of the canvas size so the same layout serves the
//! full poster and small test canvases.

use poster_common::GeoPoint;

use crate::typography::FontWeight;

pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

const COORDINATES_Y: f32 = 0.07;
const COUNTRY_Y: f32 = 0.10;
const RULE_Y: f32 = 0.125;
const RULE_X_START: f32 = 0.4;
const RULE_X_END: f32 = 0.6;
const CITY_Y: f32 = 0.14;
const ATTRIBUTION_X: f32 = 0.98;
const ATTRIBUTION_Y: f32 = 0.98;

const CITY_SIZE: f32 = 180.0;
const COUNTRY_SIZE: f32 = 66.0;
const COORDINATES_SIZE: f32 = 42.0;
const ATTRIBUTION_SIZE: f32 = 24.0;
const RULE_WIDTH: f32 = 3.0;

/// Labels printed on a poster.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterLabels {
    pub city: String,
    pub country: String,
    pub coords: GeoPoint,
}

impl PosterLabels {
    pub fn new(city: impl Into<String>, country: impl Into<String>, coords: GeoPoint) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            coords,
        }
    }
}

/// Horizontal anchor of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Center,
    Right,
}

/// Vertical anchor of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Middle,
    Bottom,
}

/// One line of text with its anchor point and typography.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub opacity: f32,
}

/// The decorative horizontal rule between country and city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub x0: f32,
    pub x1: f32,
    pub y: f32,
    pub width: f32,
}

/// Complete text layout for one poster.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterLayout {
    pub city: TextBlock,
    pub rule: Rule,
    pub country: TextBlock,
    pub coordinates: TextBlock,
    pub attribution: TextBlock,
}

impl PosterLayout {
    pub fn new(labels: &PosterLabels, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let centered = |text: String, y: f32, size: f32, weight: FontWeight, opacity: f32| TextBlock {
            text,
            x: w / 2.0,
            y: h * y,
            size,
            weight,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            opacity,
        };

        Self {
            city: centered(letter_space(&labels.city), CITY_Y, CITY_SIZE, FontWeight::Bold, 1.0),
            rule: Rule {
                x0: w * RULE_X_START,
                x1: w * RULE_X_END,
                y: h * RULE_Y,
                width: RULE_WIDTH,
            },
            country: centered(
                labels.country.to_uppercase(),
                COUNTRY_Y,
                COUNTRY_SIZE,
                FontWeight::Light,
                1.0,
            ),
            coordinates: centered(
                format_coordinates(labels.coords),
                COORDINATES_Y,
                COORDINATES_SIZE,
                FontWeight::Regular,
                0.7,
            ),
            attribution: TextBlock {
                text: ATTRIBUTION.to_string(),
                x: w * ATTRIBUTION_X,
                y: h * ATTRIBUTION_Y,
                size: ATTRIBUTION_SIZE,
                weight: FontWeight::Light,
                align: TextAlign::Right,
                baseline: TextBaseline::Bottom,
                opacity: 0.5,
            },
        }
    }
}

/// Uppercase a city name and put two spaces between every character.
pub fn letter_space(city: &str) -> String {
    let upper: Vec<String> = city.to_uppercase().chars().map(String::from).collect();
    upper.join("  ")
}

/// `48.8566° N / 2.3522° E` style coordinate label.
pub fn format_coordinates(coords: GeoPoint) -> String {
    let ns = if coords.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if coords.lon >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}° {} / {:.4}° {}",
        coords.lat.abs(),
        ns,
        coords.lon.abs(),
        ew
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_space() {
        assert_eq!(letter_space("Paris"), "P  A  R  I  S");
        assert_eq!(letter_space("São Paulo"), "S  Ã  O     P  A  U  L  O");
        assert_eq!(letter_space(""), "");
    }

    #[test]
    fn test_format_coordinates_hemispheres() {
        assert_eq!(
            format_coordinates(GeoPoint::new(48.8566, 2.3522)),
            "48.8566° N / 2.3522° E"
        );
        assert_eq!(
            format_coordinates(GeoPoint::new(-33.86882, 151.20929)),
            "33.8688° S / 151.2093° E"
        );
        assert_eq!(
            format_coordinates(GeoPoint::new(40.7128, -74.006)),
            "40.7128° N / 74.0060° W"
        );
        assert_eq!(format_coordinates(GeoPoint::new(0.0, 0.0)), "0.0000° N / 0.0000° E");
    }
}
