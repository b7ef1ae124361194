//! End-to-end poster rendering tests.
//!
//! The full-size render is expensive in debug builds, so only one test
//! renders at 3600x4800; the rest use scaled-down canvases through
//! `render_sized`, which runs the identical pipeline.

use std::sync::Arc;

use poster_common::{BoundingBox, Color, FeatureSet, Theme};
use renderer::layout::{PosterLayout, TextAlign, TextBaseline};
use renderer::{FontWeight, PosterLabels, PosterRenderer, Typography, POSTER_HEIGHT, POSTER_WIDTH};
use test_utils::{assert_approx_eq, assert_pixel_near, bbox, coords, diagonal_motorway, sample_city};

fn renderer() -> PosterRenderer {
    PosterRenderer::new(Arc::new(Typography::none()))
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png)
        .expect("poster should decode as PNG")
        .to_rgba8()
}

#[test]
fn test_full_size_motorway_diagonal() {
    // Fallback palette with chromatic water and parks, which no blend of the
    // grey road over the white background can produce
    let theme = Theme {
        water: Color::rgb(40, 90, 200),
        parks: Color::rgb(60, 180, 60),
        ..Theme::fallback()
    };
    let labels = PosterLabels::new("New York", "USA", coords::NEW_YORK);
    let png = renderer()
        .render(&labels, &diagonal_motorway(&bbox::NYC), &bbox::NYC, &theme)
        .unwrap();

    let img = decode(&png);
    assert_eq!(img.dimensions(), (POSTER_WIDTH, POSTER_HEIGHT));

    // The diagonal runs from (0, 4800) to (3600, 0): y = 4800 - 4x/3.
    let motorway = theme.road_motorway.to_array();
    for x in [1500u32, 1800, 2100] {
        let y = 4800 - x * 4 / 3;
        assert_pixel_near!(img.get_pixel(x, y).0, motorway, 2);
    }

    // Away from the line the middle of the map is bare background
    let bg = theme.bg.to_array();
    for (x, y) in [(200u32, 2400u32), (3400, 2400), (1800, 1400), (1800, 3400)] {
        assert_pixel_near!(img.get_pixel(x, y).0, bg, 0);
    }

    // Bands are opaque at the image edges, even over the road's endpoints
    let tint = theme.gradient_color.to_array();
    for x in [0u32, 1800, 3599] {
        assert_pixel_near!(img.get_pixel(x, POSTER_HEIGHT - 1).0, tint, 4);
        assert_pixel_near!(img.get_pixel(x, 0).0, tint, 4);
    }

    // No water or park fill anywhere
    let water = theme.water.to_array();
    let parks = theme.parks.to_array();
    let filled = img
        .pixels()
        .filter(|p| p.0[..3] == water[..] || p.0[..3] == parks[..])
        .count();
    assert_eq!(filled, 0);
}

#[test]
fn test_bottom_row_matches_gradient_tint() {
    let theme = Theme {
        bg: Color::rgb(255, 255, 255),
        gradient_color: Color::rgb(30, 60, 90),
        ..Theme::fallback()
    };
    let labels = PosterLabels::new("Test", "Land", coords::PARIS);
    let png = renderer()
        .render_sized(&labels, &sample_city(&bbox::NYC), &bbox::NYC, &theme, 120, 1200)
        .unwrap();

    let img = decode(&png);
    assert_eq!(img.dimensions(), (120, 1200));
    for x in 0..120 {
        let px = img.get_pixel(x, 1199).0;
        assert_pixel_near!(px, [30u8, 60, 90], 3);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn test_render_is_byte_identical() {
    let theme = Theme::fallback();
    let labels = PosterLabels::new("Sydney", "Australia", coords::SYDNEY);
    let features = sample_city(&bbox::NYC);
    let r = renderer();

    let a = r
        .render_sized(&labels, &features, &bbox::NYC, &theme, 240, 320)
        .unwrap();
    let b = r
        .render_sized(&labels, &features, &bbox::NYC, &theme, 240, 320)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_empty_feature_set_still_renders() {
    let labels = PosterLabels::new("Nowhere", "", coords::PARIS);
    let png = renderer()
        .render_sized(&labels, &FeatureSet::default(), &bbox::NYC, &Theme::fallback(), 60, 80)
        .unwrap();
    assert_eq!(decode(&png).dimensions(), (60, 80));
}

#[test]
fn test_invalid_bounds_fail_render() {
    let labels = PosterLabels::new("Flat", "Land", coords::PARIS);
    let features = FeatureSet::default();
    for bounds in [
        bbox::FLAT,
        bbox::INVERTED,
        BoundingBox::new(f64::NAN, 1.0, 0.0, 1.0),
    ] {
        let result = renderer().render_sized(&labels, &features, &bounds, &Theme::fallback(), 30, 40);
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "InvalidGeometry");
    }
}

#[test]
fn test_paris_layout() {
    let labels = PosterLabels::new("Paris", "France", coords::PARIS);
    let layout = PosterLayout::new(&labels, POSTER_WIDTH, POSTER_HEIGHT);

    assert_eq!(layout.city.text, "P  A  R  I  S");
    assert_approx_eq!(layout.city.x, 1800.0, 1e-3);
    assert_approx_eq!(layout.city.y, 0.14 * 4800.0, 1e-2);
    assert_eq!(layout.city.weight, FontWeight::Bold);
    assert_eq!(layout.city.align, TextAlign::Center);
    assert_eq!(layout.city.baseline, TextBaseline::Middle);

    assert_eq!(layout.country.text, "FRANCE");
    assert_approx_eq!(layout.country.x, 1800.0, 1e-3);
    assert_approx_eq!(layout.country.y, 480.0, 1e-2);

    assert_eq!(layout.coordinates.text, "48.8566° N / 2.3522° E");
    assert_approx_eq!(layout.coordinates.y, 0.07 * 4800.0, 1e-2);
    assert_approx_eq!(layout.coordinates.opacity, 0.7, 1e-6);

    assert_approx_eq!(layout.rule.y, 600.0, 1e-2);
    assert_approx_eq!(layout.rule.x0, 1440.0, 1e-2);
    assert_approx_eq!(layout.rule.x1, 2160.0, 1e-2);

    assert_eq!(layout.attribution.align, TextAlign::Right);
    assert_eq!(layout.attribution.baseline, TextBaseline::Bottom);
    assert_approx_eq!(layout.attribution.opacity, 0.5, 1e-6);
    assert_approx_eq!(layout.attribution.x, 0.98 * 3600.0, 1e-2);
    assert_approx_eq!(layout.attribution.y, 0.98 * 4800.0, 1e-2);
}

#[test]
fn test_layout_block_order_runs_top_down() {
    let labels = PosterLabels::new("Paris", "France", coords::PARIS);
    let layout = PosterLayout::new(&labels, POSTER_WIDTH, POSTER_HEIGHT);
    assert!(layout.coordinates.y < layout.country.y);
    assert!(layout.country.y < layout.rule.y);
    assert!(layout.rule.y < layout.city.y);
    assert!(layout.city.y < layout.attribution.y);
}
