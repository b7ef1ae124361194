//! Road classification: maps road tags to a stroke color and width.
//!
//! Water and parks are not classified; each uses a single theme color.

use poster_common::{Color, RoadTier, Tags, Theme};
use tiny_skia::Paint;

/// Stroke widths per tier, in pixels at the fixed 3600x4800 poster size.
pub const MOTORWAY_WIDTH: f32 = 3.6;
pub const PRIMARY_WIDTH: f32 = 3.0;
pub const SECONDARY_WIDTH: f32 = 2.4;
pub const TERTIARY_WIDTH: f32 = 1.8;
pub const RESIDENTIAL_WIDTH: f32 = 1.2;
pub const DEFAULT_WIDTH: f32 = 1.2;

/// Resolved stroke style for one road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStyle {
    pub color: Color,
    pub width: f32,
}

/// Style for a road tier under a theme.
pub fn tier_style(tier: RoadTier, theme: &Theme) -> RoadStyle {
    let (color, width) = match tier {
        RoadTier::Motorway => (theme.road_motorway, MOTORWAY_WIDTH),
        RoadTier::Primary => (theme.road_primary, PRIMARY_WIDTH),
        RoadTier::Secondary => (theme.road_secondary, SECONDARY_WIDTH),
        RoadTier::Tertiary => (theme.road_tertiary, TERTIARY_WIDTH),
        RoadTier::Residential => (theme.road_residential, RESIDENTIAL_WIDTH),
        RoadTier::Default => (theme.road_default, DEFAULT_WIDTH),
    };
    RoadStyle { color, width }
}

/// Classify a road by its tags. Unknown or missing `highway` values get the
/// default tier.
pub fn classify(tags: &Tags, theme: &Theme) -> RoadStyle {
    tier_style(RoadTier::from_tags(tags), theme)
}

/// Anti-aliased solid paint for a theme color.
pub fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_uses_theme_colors() {
        let theme = Theme::fallback();
        let mut tags = Tags::new();
        tags.insert("highway".to_string(), "primary_link".to_string());
        let style = classify(&tags, &theme);
        assert_eq!(style.color, theme.road_primary);
        assert_eq!(style.width, PRIMARY_WIDTH);
    }

    #[test]
    fn test_solid_paint_is_opaque() {
        let paint = solid_paint(Color::rgb(1, 2, 3));
        assert!(paint.anti_alias);
        match paint.shader {
            tiny_skia::Shader::SolidColor(c) => assert_eq!(c.alpha(), 1.0),
            _ => panic!("expected solid color shader"),
        }
    }
}
