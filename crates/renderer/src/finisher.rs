//! Poster finishing: vignette bands, typography and PNG encoding applied on
//! top of the composited map layers.

use std::sync::Arc;

use poster_common::{PosterResult, Theme};
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::gradient::paint_vignette_bands;
use crate::layout::{PosterLabels, PosterLayout, TextBlock};
use crate::typography::{draw_rule, draw_text, Typography};

/// Applies bands and text to a painted canvas.
#[derive(Debug, Clone)]
pub struct Finisher {
    typography: Arc<Typography>,
}

impl Finisher {
    pub fn new(typography: Arc<Typography>) -> Self {
        Self { typography }
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Paint bands, then the city title, rule, country, coordinates and
    /// attribution, in that order.
    pub fn apply(&self, canvas: &mut Canvas, labels: &PosterLabels, theme: &Theme) -> PosterResult<()> {
        paint_vignette_bands(canvas, theme.gradient_color)?;

        let layout = PosterLayout::new(labels, canvas.width(), canvas.height());
        if !self.typography.has_fonts() {
            warn!(city = %labels.city, "No fonts loaded, skipping poster text");
        }

        self.text(canvas, &layout.city, theme)?;
        draw_rule(canvas, &layout.rule, theme.text);
        self.text(canvas, &layout.country, theme)?;
        self.text(canvas, &layout.coordinates, theme)?;
        self.text(canvas, &layout.attribution, theme)?;

        debug!(city = %layout.city.text, "Applied poster typography");
        Ok(())
    }

    /// Apply the finishing layers and encode the canvas as PNG.
    pub fn finish(&self, mut canvas: Canvas, labels: &PosterLabels, theme: &Theme) -> PosterResult<Vec<u8>> {
        self.apply(&mut canvas, labels, theme)?;
        canvas.encode_png()
    }

    fn text(&self, canvas: &mut Canvas, block: &TextBlock, theme: &Theme) -> PosterResult<()> {
        match self.typography.font(block.weight) {
            Some(font) => draw_text(canvas, font, block, theme.text),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poster_common::{Color, GeoPoint};

    #[test]
    fn test_without_fonts_bands_and_rule_are_painted() {
        let finisher = Finisher::new(Arc::new(Typography::none()));
        let mut canvas = Canvas::new(40, 200).unwrap();
        canvas.fill(Color::rgb(255, 255, 255));

        let mut theme = Theme::fallback();
        theme.gradient_color = Color::rgb(0, 0, 0);
        let labels = PosterLabels::new("Paris", "France", GeoPoint::new(48.8566, 2.3522));

        finisher.apply(&mut canvas, &labels, &theme).unwrap();

        assert!(canvas.pixel(20, 0).unwrap()[0] <= 5);
        assert_eq!(canvas.pixel(20, 100), Some([255, 255, 255, 255]));
        // Rule at 12.5% height spanning the middle fifth of the width
        assert_eq!(canvas.pixel(20, 25).map(|p| p[0]), Some(theme.text.r));
        assert!(canvas.pixel(2, 25).unwrap()[0] > theme.text.r);
    }
}
