//! Vignette bands: linear fades of the theme tint over the top and bottom of
//! the poster that give the text a legible backdrop.

use poster_common::{Color, PosterError, PosterResult};
use tiny_skia::{GradientStop, LinearGradient, Paint, Point, Rect, SpreadMode, Transform};

use crate::canvas::Canvas;

/// Fraction of the canvas height covered by each band.
pub const BAND_FRACTION: f32 = 0.25;

/// Which edge of the canvas a band is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandEdge {
    Top,
    Bottom,
}

/// Paint the bottom and top bands, opaque at the image edge and fully
/// transparent toward the middle of the canvas.
pub fn paint_vignette_bands(canvas: &mut Canvas, tint: Color) -> PosterResult<()> {
    paint_band(canvas, tint, BandEdge::Bottom)?;
    paint_band(canvas, tint, BandEdge::Top)
}

/// Paint a single band.
pub fn paint_band(canvas: &mut Canvas, tint: Color, edge: BandEdge) -> PosterResult<()> {
    let width = canvas.width() as f32;
    let height = canvas.height() as f32;
    let band = height * BAND_FRACTION;

    let opaque = tiny_skia::Color::from_rgba8(tint.r, tint.g, tint.b, 255);
    let clear = tiny_skia::Color::from_rgba8(tint.r, tint.g, tint.b, 0);

    // (band top, gradient start, gradient end, color at start, color at end)
    let (top, start, end, from, to) = match edge {
        BandEdge::Bottom => (height - band, height - band, height, clear, opaque),
        BandEdge::Top => (0.0, 0.0, band, opaque, clear),
    };

    let shader = LinearGradient::new(
        Point::from_xy(0.0, start),
        Point::from_xy(0.0, end),
        vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| PosterError::RenderError(format!("invalid gradient band over {}px", band)))?;

    let rect = Rect::from_xywh(0.0, top, width, band)
        .ok_or_else(|| PosterError::RenderError(format!("invalid band rect {}x{}", width, band)))?;

    let paint = Paint {
        shader,
        anti_alias: false,
        ..Paint::default()
    };
    canvas
        .pixmap_mut()
        .fill_rect(rect, &paint, Transform::identity(), None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_canvas(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height).unwrap();
        canvas.fill(Color::rgb(0, 0, 0));
        canvas
    }

    #[test]
    fn test_bands_fade_toward_middle() {
        let mut canvas = black_canvas(8, 400);
        paint_vignette_bands(&mut canvas, Color::rgb(255, 255, 255)).unwrap();

        let top = canvas.pixel(4, 0).unwrap()[0];
        let near_top_edge = canvas.pixel(4, 90).unwrap()[0];
        let middle = canvas.pixel(4, 200).unwrap()[0];
        let near_bottom_edge = canvas.pixel(4, 310).unwrap()[0];
        let bottom = canvas.pixel(4, 399).unwrap()[0];

        assert!(top >= 250, "top row {}", top);
        assert!(bottom >= 250, "bottom row {}", bottom);
        assert!(near_top_edge < top);
        assert!(near_bottom_edge < bottom);
        assert_eq!(middle, 0, "middle of canvas must be untouched");
    }

    #[test]
    fn test_band_keeps_canvas_opaque() {
        let mut canvas = black_canvas(4, 100);
        paint_band(&mut canvas, Color::rgb(200, 10, 10), BandEdge::Bottom).unwrap();
        for y in 0..100 {
            assert_eq!(canvas.pixel(0, y).unwrap()[3], 255);
        }
    }
}
