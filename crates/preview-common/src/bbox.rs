//! Bounding box types and outlier-tolerant bounds estimation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PreviewError, PreviewResult};
use crate::geometry::ProjectedPoint;

/// Standard deviations kept around the mean on the horizontal axis.
pub const X_SIGMA: f64 = 5.0;

/// Standard deviations kept around the mean on the vertical axis.
pub const Y_SIGMA: f64 = 3.0;

/// Fraction of the width/height added on every side of the estimated box.
pub const PADDING_FRACTION: f64 = 1.0 / 50.0;

/// A projected bounding box in Web Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width() / self.height()
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow every side by `fraction` of the width (left/right) or height
    /// (top/bottom).
    pub fn padded(&self, fraction: f64) -> BoundingBox {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        BoundingBox {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Estimate a padded box around the bulk of `points`.
    ///
    /// Each axis is filtered on its own: x values more than 5 standard
    /// deviations from the x mean are dropped, y values more than 3 from the
    /// y mean. The surviving extremes are padded by 2% per side.
    pub fn estimate(points: &[ProjectedPoint]) -> PreviewResult<BoundingBox> {
        if points.is_empty() {
            return Err(PreviewError::InsufficientData(
                "no valid points to compute bounds from".to_string(),
            ));
        }

        let finite: Vec<ProjectedPoint> = points
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        if finite.len() < points.len() {
            warn!(
                dropped = points.len() - finite.len(),
                "Ignoring points with non-finite projected coordinates"
            );
        }
        if finite.is_empty() {
            return Err(PreviewError::InsufficientData(
                "no points with finite projected coordinates".to_string(),
            ));
        }

        let xs: Vec<f64> = finite.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = finite.iter().map(|p| p.y).collect();

        let (left, right) = filtered_extent(&xs, X_SIGMA)
            .ok_or_else(|| PreviewError::DegenerateBounds("no x values within range".into()))?;
        let (bottom, top) = filtered_extent(&ys, Y_SIGMA)
            .ok_or_else(|| PreviewError::DegenerateBounds("no y values within range".into()))?;

        if right <= left || top <= bottom {
            return Err(PreviewError::DegenerateBounds(format!(
                "zero-size extent ({} x {} meters)",
                right - left,
                top - bottom
            )));
        }

        Ok(BoundingBox::new(left, bottom, right, top).padded(PADDING_FRACTION))
    }
}

/// Mean and population standard deviation.
pub fn stats(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Min and max of the values lying within `sigmas` deviations of the mean.
fn filtered_extent(values: &[f64], sigmas: f64) -> Option<(f64, f64)> {
    let (mean, sdev) = stats(values);
    let (lo, hi) = (mean - sigmas * sdev, mean + sigmas * sdev);

    values
        .iter()
        .copied()
        .filter(|v| (lo..=hi).contains(v))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
