//! Preview composition.
//!
//! Draw order: background over the whole canvas, landuse fills, water fills,
//! road strokes, then one marker per source point. Widths are multiples of
//! the plan's map units per pixel so they stay constant on screen.

use std::f64::consts::PI;

use tracing::{debug, instrument};

use preview_common::{
    Geometry, GridPlan, Layer, LayerKind, PreviewResult, ProjectedPoint, Ring,
};

use crate::canvas::{Canvas, PathCommand};
use crate::style::{Palette, Rgb};

/// Road stroke width in reference pixels.
pub const ROAD_WIDTH_PX: f64 = 0.5;

/// Point marker outline width in reference pixels.
pub const POINT_OUTLINE_PX: f64 = 0.25;

/// Point marker radius in map units (meters).
pub const POINT_RADIUS: f64 = 15.0;

/// Buffer radius for point features in fill layers, in reference pixels.
pub const POINT_BUFFER_PX: f64 = 2.0;

/// Segments per quarter circle when buffering a point feature.
pub const BUFFER_QUADRANT_SEGMENTS: usize = 3;

/// Renders classified layers and source points onto a canvas.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    palette: Palette,
}

impl Rasterizer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Draw a full preview.
    ///
    /// Layers are drawn landuse, water, roads regardless of slice order.
    #[instrument(skip_all, fields(width = plan.width_px, height = plan.height_px))]
    pub fn render(
        &self,
        plan: &GridPlan,
        layers: &[&Layer],
        points: &[ProjectedPoint],
    ) -> PreviewResult<Canvas> {
        let mut canvas = Canvas::new(plan)?;
        let muppx = plan.map_units_per_pixel();

        canvas.clear(self.palette.background);

        for kind in LayerKind::ALL {
            for layer in layers.iter().filter(|l| l.kind() == kind) {
                match kind {
                    LayerKind::Landuse => fill_layer(&mut canvas, layer, muppx, self.palette.landuse),
                    LayerKind::Water => fill_layer(&mut canvas, layer, muppx, self.palette.water),
                    LayerKind::Roads => {
                        stroke_layer(&mut canvas, layer, ROAD_WIDTH_PX * muppx, self.palette.road)
                    }
                }
            }
        }

        for &center in points {
            let marker = [PathCommand::Circle {
                center,
                radius: POINT_RADIUS,
            }];
            canvas.fill(&marker, self.palette.point_fill);
            canvas.stroke(&marker, self.palette.point_outline, POINT_OUTLINE_PX * muppx);
        }

        debug!(points = points.len(), "Rendered preview");
        Ok(canvas)
    }
}

/// Fill every polygon of a layer, one fill per polygon part.
fn fill_layer(canvas: &mut Canvas, layer: &Layer, muppx: f64, color: Rgb) {
    for feature in layer.features() {
        match &feature.geometry {
            Geometry::Polygon(rings) => canvas.fill(&polygon_path(rings), color),
            Geometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    canvas.fill(&polygon_path(rings), color);
                }
            }
            Geometry::Point(center) => {
                let ring = buffer_point(*center, POINT_BUFFER_PX * muppx, BUFFER_QUADRANT_SEGMENTS);
                canvas.fill(&ring_path(&ring), color);
            }
            Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                debug!(
                    kind = %feature.kind,
                    geometry = feature.geometry.type_name(),
                    "Lines are not filled"
                );
            }
        }
    }
}

/// Stroke every ring or line of a layer separately.
fn stroke_layer(canvas: &mut Canvas, layer: &Layer, width: f64, color: Rgb) {
    for feature in layer.features() {
        match &feature.geometry {
            Geometry::LineString(line) => canvas.stroke(&line_path(line), color, width),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    canvas.stroke(&line_path(line), color, width);
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    canvas.stroke(&ring_path(ring), color, width);
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    canvas.stroke(&ring_path(ring), color, width);
                }
            }
            Geometry::Point(_) => {}
        }
    }
}

/// Start at the ring's last point and pass through all of its points.
pub fn ring_path(ring: &[ProjectedPoint]) -> Vec<PathCommand> {
    let Some(&last) = ring.last() else {
        return Vec::new();
    };
    std::iter::once(PathCommand::MoveTo(last))
        .chain(ring.iter().copied().map(PathCommand::LineTo))
        .collect()
}

/// Start at the first point and pass through the rest.
pub fn line_path(line: &[ProjectedPoint]) -> Vec<PathCommand> {
    let Some((&first, rest)) = line.split_first() else {
        return Vec::new();
    };
    std::iter::once(PathCommand::MoveTo(first))
        .chain(rest.iter().copied().map(PathCommand::LineTo))
        .collect()
}

/// All rings of one polygon as a single path, so holes cut out under the
/// winding rule.
pub fn polygon_path(rings: &[Ring]) -> Vec<PathCommand> {
    rings.iter().flat_map(|ring| ring_path(ring)).collect()
}

/// Approximate a disc around `center` with `4 * quadrant_segments` edges.
///
/// The ring is closed (first point repeated at the end) and runs
/// counter-clockwise starting due east.
pub fn buffer_point(center: ProjectedPoint, radius: f64, quadrant_segments: usize) -> Ring {
    let segments = 4 * quadrant_segments.max(1);
    (0..=segments)
        .map(|i| {
            let angle = 2.0 * PI * (i % segments) as f64 / segments as f64;
            ProjectedPoint::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> ProjectedPoint {
        ProjectedPoint::new(x, y)
    }

    #[test]
    fn test_ring_path_starts_at_last_point() {
        let ring = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let path = ring_path(&ring);
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], PathCommand::MoveTo(p(1.0, 1.0)));
        assert_eq!(path[1], PathCommand::LineTo(p(0.0, 0.0)));
        assert_eq!(path[3], PathCommand::LineTo(p(1.0, 1.0)));
    }

    #[test]
    fn test_line_path_starts_at_first_point() {
        let path = line_path(&[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
        assert_eq!(
            path,
            vec![
                PathCommand::MoveTo(p(0.0, 0.0)),
                PathCommand::LineTo(p(2.0, 0.0)),
                PathCommand::LineTo(p(2.0, 2.0)),
            ]
        );
        assert!(line_path(&[]).is_empty());
        assert!(ring_path(&[]).is_empty());
    }

    #[test]
    fn test_polygon_path_joins_rings() {
        let outer = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 0.0)];
        let hole = vec![p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(1.0, 1.0)];
        let path = polygon_path(&[outer, hole]);
        let moves = path
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_buffer_point_has_twelve_edges() {
        let ring = buffer_point(p(100.0, 200.0), 10.0, 3);
        assert_eq!(ring.len(), 13);
        assert_eq!(ring.first(), ring.last());
        for point in &ring {
            let r = ((point.x - 100.0).powi(2) + (point.y - 200.0).powi(2)).sqrt();
            assert!((r - 10.0).abs() < 1e-9);
        }
        assert!((ring[3].x - 100.0).abs() < 1e-9);
        assert!((ring[3].y - 210.0).abs() < 1e-9);
    }
}
