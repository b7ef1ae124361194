//! Poster rendering: geographic features to a finished PNG.
//!
//! The pipeline runs in a fixed order:
//! - project and composite map layers ([`compositor`])
//! - paint vignette bands ([`gradient`])
//! - lay out and draw text ([`layout`], [`typography`])
//! - encode the canvas ([`png`])
//!
//! Every render owns its canvas; the only shared state is the read-only
//! [`Typography`] loaded at startup.

pub mod canvas;
pub mod compositor;
pub mod finisher;
pub mod gradient;
pub mod layout;
pub mod png;
pub mod style;
pub mod typography;

use std::sync::Arc;
use std::time::Instant;

use poster_common::{BoundingBox, FeatureSet, PosterResult, Theme};
use tracing::info;

pub use canvas::{Canvas, POSTER_HEIGHT, POSTER_WIDTH};
pub use compositor::{Compositor, LayerStats, RingClosure};
pub use finisher::Finisher;
pub use layout::{PosterLabels, PosterLayout};
pub use style::{classify, tier_style, RoadStyle};
pub use typography::{FontWeight, Typography};

/// Renders complete posters.
#[derive(Debug, Clone)]
pub struct PosterRenderer {
    compositor: Compositor,
    finisher: Finisher,
}

impl PosterRenderer {
    pub fn new(typography: Arc<Typography>) -> Self {
        Self {
            compositor: Compositor::new(),
            finisher: Finisher::new(typography),
        }
    }

    pub fn with_ring_closure(mut self, ring_closure: RingClosure) -> Self {
        self.compositor = self.compositor.with_ring_closure(ring_closure);
        self
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn finisher(&self) -> &Finisher {
        &self.finisher
    }

    /// Render a full-size poster and return the encoded PNG.
    pub fn render(
        &self,
        labels: &PosterLabels,
        features: &FeatureSet,
        bounds: &BoundingBox,
        theme: &Theme,
    ) -> PosterResult<Vec<u8>> {
        bounds.validate()?;
        self.render_on(Canvas::poster()?, labels, features, bounds, theme)
    }

    /// Run the full pipeline on a smaller canvas.
    ///
    /// Positions scale with the canvas but type sizes and stroke widths do
    /// not, so only tests and benchmarks should use this.
    #[doc(hidden)]
    pub fn render_sized(
        &self,
        labels: &PosterLabels,
        features: &FeatureSet,
        bounds: &BoundingBox,
        theme: &Theme,
        width: u32,
        height: u32,
    ) -> PosterResult<Vec<u8>> {
        bounds.validate()?;
        self.render_on(Canvas::new(width, height)?, labels, features, bounds, theme)
    }

    fn render_on(
        &self,
        mut canvas: Canvas,
        labels: &PosterLabels,
        features: &FeatureSet,
        bounds: &BoundingBox,
        theme: &Theme,
    ) -> PosterResult<Vec<u8>> {
        let start = Instant::now();
        let stats = self.compositor.paint(&mut canvas, features, bounds, theme)?;
        let layers_ms = start.elapsed().as_millis();

        let png = self.finisher.finish(canvas, labels, theme)?;

        info!(
            city = %labels.city,
            theme = %theme.name,
            roads = stats.roads,
            water = stats.water,
            parks = stats.parks,
            layers_ms = layers_ms as u64,
            total_ms = start.elapsed().as_millis() as u64,
            bytes = png.len(),
            "Rendered poster"
        );
        Ok(png)
    }
}
