//! Font loading and text rasterization.
//!
//! Fonts are loaded once by the process entry point through
//! [`Typography::load`] and shared read-only between renders. When no font
//! can be found the poster is still produced, without text.

use std::fmt;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use poster_common::{Color, PosterError, PosterResult};
use rusttype::{point, Font, Scale};
use serde::{Deserialize, Serialize};
use tiny_skia::{IntSize, LineCap, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};
use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::layout::{Rule, TextAlign, TextBaseline, TextBlock};
use crate::style::solid_paint;

/// Font weights used on the poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Light,
    Regular,
    Bold,
}

impl FontWeight {
    /// File name looked up in the configured font directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FontWeight::Light => "Roboto-Light.ttf",
            FontWeight::Regular => "Roboto-Regular.ttf",
            FontWeight::Bold => "Roboto-Bold.ttf",
        }
    }

    /// System font paths tried when the font directory lacks this weight.
    fn system_fallbacks(self) -> &'static [&'static str] {
        match self {
            FontWeight::Light => &[
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-ExtraLight.ttf",
                "/usr/share/fonts/TTF/DejaVuSans-ExtraLight.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans-ExtraLight.ttf",
            ],
            FontWeight::Regular => &[
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
            ],
            FontWeight::Bold => &[
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
                "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
                "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            ],
        }
    }
}

/// The set of fonts available to the poster finisher.
#[derive(Clone, Default)]
pub struct Typography {
    light: Option<Font<'static>>,
    regular: Option<Font<'static>>,
    bold: Option<Font<'static>>,
}

impl fmt::Debug for Typography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typography")
            .field("light", &self.light.is_some())
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl Typography {
    /// Typography without fonts; text is skipped.
    pub fn none() -> Self {
        Self::default()
    }

    /// Load fonts from `font_dir` (Roboto file names), falling back to
    /// common system fonts per weight.
    pub fn load(font_dir: Option<&Path>) -> Self {
        let mut typography = Self::none();
        for weight in [FontWeight::Light, FontWeight::Regular, FontWeight::Bold] {
            let candidates = font_dir
                .map(|dir| dir.join(weight.file_name()))
                .into_iter()
                .chain(weight.system_fallbacks().iter().map(PathBuf::from));

            let font = candidates.filter(|p| p.is_file()).find_map(|path| {
                let font = read_font(&path);
                if font.is_some() {
                    info!(weight = ?weight, path = %path.display(), "Loaded font");
                }
                font
            });
            typography.set(weight, font);
        }

        if !typography.has_fonts() {
            warn!("No fonts found, posters will be rendered without text");
        }
        typography
    }

    /// Build from raw font bytes; `regular` is required.
    pub fn from_bytes(
        regular: Vec<u8>,
        bold: Option<Vec<u8>>,
        light: Option<Vec<u8>>,
    ) -> PosterResult<Self> {
        let parse = |bytes: Vec<u8>, weight: FontWeight| {
            Font::try_from_vec(bytes).ok_or_else(|| {
                PosterError::RenderError(format!("invalid {:?} font data", weight))
            })
        };
        Ok(Self {
            regular: Some(parse(regular, FontWeight::Regular)?),
            bold: bold.map(|b| parse(b, FontWeight::Bold)).transpose()?,
            light: light.map(|l| parse(l, FontWeight::Light)).transpose()?,
        })
    }

    fn set(&mut self, weight: FontWeight, font: Option<Font<'static>>) {
        match weight {
            FontWeight::Light => self.light = font,
            FontWeight::Regular => self.regular = font,
            FontWeight::Bold => self.bold = font,
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some() || self.light.is_some()
    }

    /// Font for a weight, substituting any loaded weight when it is missing.
    pub fn font(&self, weight: FontWeight) -> Option<&Font<'static>> {
        let preferred = match weight {
            FontWeight::Light => &self.light,
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        preferred
            .as_ref()
            .or(self.regular.as_ref())
            .or(self.bold.as_ref())
            .or(self.light.as_ref())
    }
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let font = Font::try_from_vec(bytes);
            if font.is_none() {
                warn!(path = %path.display(), "Not a usable TrueType font");
            }
            font
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read font");
            None
        }
    }
}

/// Advance width and line height of `text` at `size` pixels.
pub fn measure_text(font: &Font<'_>, size: f32, text: &str) -> (f32, f32) {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    (width, v_metrics.ascent - v_metrics.descent)
}

/// Top-left corner of a block's text box given its measured size.
pub fn text_origin(block: &TextBlock, text_width: f32, line_height: f32) -> (f32, f32) {
    let left = match block.align {
        TextAlign::Center => block.x - text_width / 2.0,
        TextAlign::Right => block.x - text_width,
    };
    let top = match block.baseline {
        TextBaseline::Middle => block.y - line_height / 2.0,
        TextBaseline::Bottom => block.y - line_height,
    };
    (left, top)
}

/// Part of a text box that falls on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerClip {
    /// Canvas position of the layer's top-left pixel.
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Where the text box origin sits relative to the layer (never positive).
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Intersect a text box at (`left`, `top`) with a `canvas_w` x `canvas_h`
/// canvas. `None` when nothing of the box is visible.
pub fn clip_text_layer(
    left: f32,
    top: f32,
    text_width: f32,
    line_height: f32,
    canvas_w: u32,
    canvas_h: u32,
) -> Option<LayerClip> {
    let left = left.round() as i64;
    let top = top.round() as i64;
    // One pixel of slack on each side for antialiased glyph edges
    let box_w = text_width.ceil().max(1.0) as i64 + 2;
    let box_h = line_height.ceil().max(1.0) as i64 + 2;

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = left.saturating_add(box_w).min(canvas_w as i64);
    let y1 = top.saturating_add(box_h).min(canvas_h as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(LayerClip {
        x: x0 as i32,
        y: y0 as i32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
        offset_x: (left - x0).max(i32::MIN as i64) as i32,
        offset_y: (top - y0).max(i32::MIN as i64) as i32,
    })
}

/// Byte range of the glyphs of `text` that overlap `[from_x, to_x]`, plus
/// the pen position of the first one. Glyphs within one em of the window
/// are kept so overhanging outlines are not cut.
pub fn visible_span(font: &Font<'_>, size: f32, text: &str, from_x: f32, to_x: f32) -> (usize, usize, f32) {
    let scale = Scale::uniform(size);
    let from_x = from_x - size;
    let to_x = to_x + size;

    let mut span: Option<(usize, usize, f32)> = None;
    for ((idx, ch), glyph) in text.char_indices().zip(font.layout(text, scale, point(0.0, 0.0))) {
        let x = glyph.position().x;
        let advance = glyph.unpositioned().h_metrics().advance_width;
        if x > to_x {
            break;
        }
        if x + advance < from_x {
            continue;
        }
        let end = idx + ch.len_utf8();
        span = Some(match span {
            Some((start, _, start_x)) => (start, end, start_x),
            None => (idx, end, x),
        });
    }
    span.unwrap_or((0, 0, 0.0))
}

/// Rasterize a text block onto the canvas with the block's opacity.
///
/// Glyphs are drawn into an offscreen layer covering the visible part of the
/// text box, then composited with source-over blending.
pub fn draw_text(canvas: &mut Canvas, font: &Font<'_>, block: &TextBlock, color: Color) -> PosterResult<()> {
    if block.text.trim().is_empty() {
        return Ok(());
    }

    let (text_width, line_height) = measure_text(font, block.size, &block.text);
    let (left, top) = text_origin(block, text_width, line_height);
    let Some(clip) = clip_text_layer(left, top, text_width, line_height, canvas.width(), canvas.height())
    else {
        debug!(text_len = block.text.len(), x = left, y = top, "Text block entirely off canvas");
        return Ok(());
    };

    // Only glyphs near the visible window are rasterized
    let window_start = -(clip.offset_x as f32);
    let (start, end, start_x) = visible_span(
        font,
        block.size,
        &block.text,
        window_start,
        window_start + clip.width as f32,
    );

    // Drawing over transparent black leaves premultiplied RGBA in the layer.
    let mut layer = RgbaImage::from_pixel(clip.width, clip.height, Rgba([0, 0, 0, 0]));
    draw_text_mut(
        &mut layer,
        Rgba([color.r, color.g, color.b, 255]),
        clip.offset_x.saturating_add(start_x.round() as i32),
        clip.offset_y,
        Scale::uniform(block.size),
        font,
        &block.text[start..end],
    );

    let size = IntSize::from_wh(clip.width, clip.height).ok_or_else(|| {
        PosterError::RenderError(format!("invalid text layer {}x{}", clip.width, clip.height))
    })?;
    let layer = Pixmap::from_vec(layer.into_raw(), size)
        .ok_or_else(|| PosterError::RenderError("text layer buffer size mismatch".to_string()))?;

    let paint = PixmapPaint {
        opacity: block.opacity,
        ..PixmapPaint::default()
    };
    canvas
        .pixmap_mut()
        .draw_pixmap(clip.x, clip.y, layer.as_ref(), &paint, Transform::identity(), None);

    debug!(text_len = block.text.len(), x = left, y = top, "Drew text block");
    Ok(())
}

/// Stroke the decorative rule.
pub fn draw_rule(canvas: &mut Canvas, rule: &Rule, color: Color) {
    let mut pb = PathBuilder::new();
    pb.move_to(rule.x0, rule.y);
    pb.line_to(rule.x1, rule.y);
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width: rule.width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };
    canvas
        .pixmap_mut()
        .stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
}
