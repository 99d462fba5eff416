//! Drawing surface for previews.
//!
//! Geometry arrives in Web Mercator meters. Coordinates are mapped to pixels
//! in f64 before they reach tiny-skia, since meter values lose too much
//! precision as f32.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};
use tracing::trace;

use preview_common::{GridPlan, PreviewError, PreviewResult, ProjectedPoint};

use crate::png::encode_png;
use crate::style::Rgb;

/// Miter limit matching the usual vector graphics default.
const MITER_LIMIT: f32 = 10.0;

/// Affine map from projected meters to canvas pixels.
///
/// `pixel_x = (x - origin_x) * scale_x`, `pixel_y = (y - origin_y) * scale_y`
/// with the origin at the north-west corner and `scale_y` negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl MapTransform {
    pub fn from_plan(plan: &GridPlan) -> Self {
        Self {
            origin_x: plan.bounds.min_x,
            origin_y: plan.bounds.max_y,
            scale_x: plan.scale,
            scale_y: plan.vertical_scale(),
        }
    }

    /// Pixel position of a projected point.
    pub fn to_pixel(&self, point: ProjectedPoint) -> (f64, f64) {
        (
            (point.x - self.origin_x) * self.scale_x,
            (point.y - self.origin_y) * self.scale_y,
        )
    }

    /// Pixel length of a horizontal distance in meters.
    pub fn length(&self, map_units: f64) -> f64 {
        map_units * self.scale_x
    }
}

/// One step of a path, in map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(ProjectedPoint),
    LineTo(ProjectedPoint),
    /// Full circle as its own closed subpath
    Circle { center: ProjectedPoint, radius: f64 },
}

/// An RGBA canvas sized from a [`GridPlan`].
pub struct Canvas {
    pixmap: Pixmap,
    transform: MapTransform,
}

impl Canvas {
    /// Create a transparent canvas for the plan.
    pub fn new(plan: &GridPlan) -> PreviewResult<Self> {
        let pixmap = Pixmap::new(plan.width_px, plan.height_px).ok_or_else(|| {
            PreviewError::RenderError(format!(
                "cannot allocate a {}x{} canvas",
                plan.width_px, plan.height_px
            ))
        })?;

        Ok(Self {
            pixmap,
            transform: MapTransform::from_plan(plan),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn transform(&self) -> &MapTransform {
        &self.transform
    }

    /// Fill the path with the winding rule.
    pub fn fill(&mut self, commands: &[PathCommand], color: Rgb) {
        let Some(path) = self.build_path(commands) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Stroke the path with butt caps and miter joins. `width` is in map units.
    pub fn stroke(&mut self, commands: &[PathCommand], color: Rgb, width: f64) {
        let Some(path) = self.build_path(commands) else {
            return;
        };
        let stroke = Stroke {
            width: self.transform.length(width) as f32,
            miter_limit: MITER_LIMIT,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash: None,
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Paint every pixel with an opaque color.
    ///
    /// Covers the whole pixmap, including the last row when the plan's
    /// height was rounded up past the bounds.
    pub fn clear(&mut self, color: Rgb) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    /// Straight RGBA at a pixel, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn encode_png(&self) -> PreviewResult<Vec<u8>> {
        encode_png(&self.to_rgba(), self.width(), self.height())
    }

    fn build_path(&self, commands: &[PathCommand]) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for command in commands {
            match *command {
                PathCommand::MoveTo(point) => {
                    let (x, y) = self.transform.to_pixel(point);
                    pb.move_to(x as f32, y as f32);
                }
                PathCommand::LineTo(point) => {
                    let (x, y) = self.transform.to_pixel(point);
                    pb.line_to(x as f32, y as f32);
                }
                PathCommand::Circle { center, radius } => {
                    let (x, y) = self.transform.to_pixel(center);
                    let r = self.transform.length(radius) as f32;
                    if r > 0.0 {
                        pb.push_circle(x as f32, y as f32, r);
                    }
                }
            }
        }

        let path = pb.finish();
        if path.is_none() {
            trace!(commands = commands.len(), "Skipping empty path");
        }
        path
    }
}

fn paint(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_common::{BoundingBox, Resolution};

    fn plan() -> GridPlan {
        GridPlan::new(BoundingBox::new(0.0, 0.0, 100.0, 50.0), 200, Resolution::Normal).unwrap()
    }

    #[test]
    fn test_transform_corners() {
        let t = MapTransform::from_plan(&plan());
        assert_eq!(t.to_pixel(ProjectedPoint::new(0.0, 50.0)), (0.0, 0.0));

        let (x, y) = t.to_pixel(ProjectedPoint::new(100.0, 0.0));
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);
        assert!((t.length(10.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(&plan()).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 100));
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(200, 0), None);
    }

    #[test]
    fn test_clear_covers_canvas() {
        let mut canvas = Canvas::new(&plan()).unwrap();
        canvas.clear(Rgb::new(0x12, 0x34, 0x56));

        assert_eq!(canvas.pixel(0, 0), Some([0x12, 0x34, 0x56, 255]));
        assert_eq!(canvas.pixel(199, 99), Some([0x12, 0x34, 0x56, 255]));
        assert_eq!(canvas.to_rgba().len(), 200 * 100 * 4);
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let mut canvas = Canvas::new(&plan()).unwrap();
        canvas.fill(&[], Rgb::BLACK);
        canvas.stroke(&[PathCommand::MoveTo(ProjectedPoint::new(5.0, 5.0))], Rgb::BLACK, 1.0);
        assert!(canvas.to_rgba().iter().all(|&b| b == 0));
    }
}
