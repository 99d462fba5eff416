//! Canvas sizing, zoom selection and slippy-map tile planning.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{PreviewError, PreviewResult};
use crate::BoundingBox;

/// Spherical Web Mercator radius in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Side of the full Web Mercator square in meters.
pub const EARTH_CIRCUMFERENCE: f64 = 2.0 * PI * EARTH_RADIUS;

/// Tile edge in pixels used by the zoom formula.
pub const TILE_SIZE: f64 = 256.0;

/// Highest zoom level the planner will request.
pub const MAX_ZOOM: u32 = 30;

/// A tile coordinate (z/x/y), row 0 at the north edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Web Mercator bounds covered by this tile, in meters.
    pub fn bbox(&self) -> BoundingBox {
        let n = 2f64.powi(self.z as i32);
        let span = EARTH_CIRCUMFERENCE / n;
        let half = EARTH_CIRCUMFERENCE / 2.0;

        let min_x = self.x as f64 * span - half;
        let max_y = half - self.y as f64 * span;

        BoundingBox::new(min_x, max_y - span, min_x + span, max_y)
    }
}

/// Output resolution multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    Normal,
    Double,
}

impl Resolution {
    pub fn factor(&self) -> u32 {
        match self {
            Resolution::Normal => 1,
            Resolution::Double => 2,
        }
    }
}

/// Continuous web map zoom for a scale in pixels per meter.
pub fn calculate_zoom(scale: f64, resolution: Resolution) -> f64 {
    let scale_at_zero = resolution.factor() as f64 * TILE_SIZE / EARTH_CIRCUMFERENCE;
    (scale / scale_at_zero).log2()
}

/// Fractional tile column of a Web Mercator x at zoom level `n = 2^z`.
fn col_index(x: f64, n: f64) -> f64 {
    n * (x + EARTH_CIRCUMFERENCE / 2.0) / EARTH_CIRCUMFERENCE
}

/// Fractional tile row of a Web Mercator y at zoom level `n = 2^z`.
fn row_index(y: f64, n: f64) -> f64 {
    n * (EARTH_CIRCUMFERENCE / 2.0 - y) / EARTH_CIRCUMFERENCE
}

/// Truncate a fractional index toward zero and clamp it into the grid.
fn clamp_index(index: f64, n: f64) -> u32 {
    (index as i64).clamp(0, n as i64 - 1) as u32
}

/// Canvas size, scale and tile set derived from a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    pub bounds: BoundingBox,
    pub resolution: Resolution,
    /// Canvas width in pixels (resolution times the requested width).
    pub width_px: u32,
    /// Canvas height in pixels, preserving the bounds' aspect.
    pub height_px: u32,
    /// Horizontal pixels per meter.
    pub scale: f64,
    pub continuous_zoom: f64,
    /// Integer zoom used for tile requests.
    pub zoom: u32,
}

impl GridPlan {
    /// Size the canvas for `bounds` at `width` reference pixels and pick the
    /// tile zoom matching its scale.
    pub fn new(bounds: BoundingBox, width: u32, resolution: Resolution) -> PreviewResult<Self> {
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(PreviewError::DegenerateBounds(format!(
                "cannot plan a canvas for {:?}",
                bounds
            )));
        }
        if width == 0 {
            return Err(PreviewError::RenderError("output width must be positive".into()));
        }

        let width_px = resolution.factor().checked_mul(width).ok_or_else(|| {
            PreviewError::RenderError(format!(
                "output width {} is too large at {:?} resolution",
                width, resolution
            ))
        })?;
        let height_px = ((width_px as f64 / bounds.aspect()).round() as u32).max(1);
        let scale = width_px as f64 / bounds.width();
        let continuous_zoom = calculate_zoom(scale, resolution);
        let zoom = (continuous_zoom.round().max(0.0) as u32).min(MAX_ZOOM);

        Ok(Self {
            bounds,
            resolution,
            width_px,
            height_px,
            scale,
            continuous_zoom,
            zoom,
        })
    }

    /// Vertical pixels per meter; negative so that north is row 0.
    pub fn vertical_scale(&self) -> f64 {
        (self.width_px as f64 / self.bounds.aspect()) / (self.bounds.min_y - self.bounds.max_y)
    }

    /// Map units represented by one reference pixel.
    pub fn map_units_per_pixel(&self) -> f64 {
        self.resolution.factor() as f64 / self.scale
    }

    /// Inclusive column and row ranges covering the bounds at the fetch zoom.
    pub fn tile_ranges(&self) -> ((u32, u32), (u32, u32)) {
        let n = 2f64.powi(self.zoom as i32);
        let b = &self.bounds;

        let min_col = clamp_index(col_index(b.min_x, n), n);
        let max_col = clamp_index(col_index(b.max_x, n), n);
        let min_row = clamp_index(row_index(b.max_y, n), n);
        let max_row = clamp_index(row_index(b.min_y, n), n);

        ((min_col, max_col), (min_row, max_row))
    }

    /// Every tile touching the bounds, row-major from the north-west corner.
    pub fn tiles(&self) -> Vec<TileCoord> {
        let ((min_col, max_col), (min_row, max_row)) = self.tile_ranges();

        (min_row..=max_row)
            .flat_map(|y| (min_col..=max_col).map(move |x| TileCoord::new(self.zoom, x, y)))
            .collect()
    }
}
