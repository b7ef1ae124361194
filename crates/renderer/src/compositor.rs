//! Layer compositing: background, water, parks and roads painted back to
//! front onto a canvas.
//!
//! Features within a layer are drawn in input order with opaque fills, so a
//! later polygon simply covers an earlier one where they overlap.

use poster_common::{Area, BoundingBox, Color, FeatureSet, GeoPoint, PosterResult, Road, Theme};
use projection::LinearProjector;
use tiny_skia::{FillRule, LineCap, LineJoin, Path, PathBuilder, Stroke, Transform};
use tracing::debug;

use crate::canvas::Canvas;
use crate::style::{solid_paint, tier_style};

/// How area rings are closed before filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RingClosure {
    /// Always connect the last point back to the first.
    #[default]
    Always,
    /// Drop a final point that repeats the first before closing, for
    /// sources that deliver explicitly closed rings.
    DropExplicitClose,
}

/// Counts of features actually drawn per layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub water: usize,
    pub parks: usize,
    pub roads: usize,
}

/// Paints a [`FeatureSet`] in fixed z-order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    ring_closure: RingClosure,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ring_closure(mut self, ring_closure: RingClosure) -> Self {
        self.ring_closure = ring_closure;
        self
    }

    pub fn ring_closure(&self) -> RingClosure {
        self.ring_closure
    }

    /// Paint background, water, parks and roads.
    ///
    /// The bounding box is validated before anything is drawn.
    pub fn paint(
        &self,
        canvas: &mut Canvas,
        features: &FeatureSet,
        bounds: &BoundingBox,
        theme: &Theme,
    ) -> PosterResult<LayerStats> {
        let projector = LinearProjector::new(*bounds, canvas.width(), canvas.height())?;

        canvas.fill(theme.bg);

        let stats = LayerStats {
            water: self.fill_areas(canvas, &projector, &features.water, theme.water),
            parks: self.fill_areas(canvas, &projector, &features.parks, theme.parks),
            roads: self.stroke_roads(canvas, &projector, &features.roads, theme),
        };

        debug!(
            water = stats.water,
            parks = stats.parks,
            roads = stats.roads,
            "Painted map layers"
        );
        Ok(stats)
    }

    fn fill_areas(
        &self,
        canvas: &mut Canvas,
        projector: &LinearProjector,
        areas: &[Area],
        color: Color,
    ) -> usize {
        let paint = solid_paint(color);
        let mut drawn = 0;
        for area in areas {
            let Some(path) = self.ring_path(projector, &area.points) else {
                continue;
            };
            canvas.pixmap_mut().fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            drawn += 1;
        }
        drawn
    }

    fn stroke_roads(
        &self,
        canvas: &mut Canvas,
        projector: &LinearProjector,
        roads: &[Road],
        theme: &Theme,
    ) -> usize {
        let mut drawn = 0;
        for road in roads {
            let Some(path) = line_path(projector, &road.points) else {
                continue;
            };
            let style = tier_style(road.tier, theme);
            let paint = solid_paint(style.color);
            let stroke = Stroke {
                width: style.width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            canvas
                .pixmap_mut()
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            drawn += 1;
        }
        drawn
    }

    fn ring_path(&self, projector: &LinearProjector, points: &[GeoPoint]) -> Option<Path> {
        let ring = match self.ring_closure {
            RingClosure::DropExplicitClose if points.len() > 1 && points.first() == points.last() => {
                &points[..points.len() - 1]
            }
            _ => points,
        };
        if ring.len() < 3 {
            return None;
        }
        let mut pb = polyline(projector, ring)?;
        pb.close();
        pb.finish()
    }
}

fn line_path(projector: &LinearProjector, points: &[GeoPoint]) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }
    polyline(projector, points)?.finish()
}

fn polyline(projector: &LinearProjector, points: &[GeoPoint]) -> Option<PathBuilder> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::with_capacity(points.len() + 1, points.len() + 1);
    let (x, y) = projector.project(*first);
    pb.move_to(x, y);
    for point in rest {
        let (x, y) = projector.project(*point);
        pb.line_to(x, y);
    }
    Some(pb)
}
