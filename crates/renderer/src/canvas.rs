//! The raster surface a single poster is painted on.

use poster_common::{Color, PosterError, PosterResult};
use rayon::prelude::*;
use tiny_skia::Pixmap;

use crate::png::create_png_auto;

/// Poster width: 12 inches at 300 DPI.
pub const POSTER_WIDTH: u32 = 3600;

/// Poster height: 16 inches at 300 DPI.
pub const POSTER_HEIGHT: u32 = 4800;

/// A mutable RGBA surface owned by one render call.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocate a transparent canvas.
    pub fn new(width: u32, height: u32) -> PosterResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PosterError::RenderError(format!("cannot allocate {}x{} canvas", width, height))
        })?;
        Ok(Self { pixmap })
    }

    /// Allocate a canvas at the fixed poster size.
    pub fn poster() -> PosterResult<Self> {
        Self::new(POSTER_WIDTH, POSTER_HEIGHT)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole canvas with an opaque color.
    pub fn fill(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Straight RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.pixmap.pixels().len() * 4];
        out.par_chunks_mut(4)
            .zip(self.pixmap.pixels().par_iter())
            .for_each(|(dst, px)| {
                let c = px.demultiply();
                dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            });
        out
    }

    /// Encode the canvas as a PNG, consuming it.
    pub fn encode_png(self) -> PosterResult<Vec<u8>> {
        let rgba = self.to_rgba();
        create_png_auto(&rgba, self.width() as usize, self.height() as usize)
    }
}
