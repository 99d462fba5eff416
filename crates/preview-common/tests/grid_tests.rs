//! Tests for canvas sizing, zoom selection and tile coverage.

use preview_common::tile::{calculate_zoom, EARTH_CIRCUMFERENCE};
use preview_common::{BoundingBox, GridPlan, Resolution, TileCoord};
use test_utils::assert_approx_eq;

// ============================================================================
// Zoom
// ============================================================================

#[test]
fn test_zoom_strictly_increasing_in_scale() {
    for resolution in [Resolution::Normal, Resolution::Double] {
        let mut previous = f64::NEG_INFINITY;
        for exp in -20..20 {
            let zoom = calculate_zoom(2f64.powi(exp) * 1e-3, resolution);
            assert!(zoom > previous);
            previous = zoom;
        }
    }
}

#[test]
fn test_fetch_zoom_is_rounded_continuous_zoom() {
    // 10 km wide at 668 px: continuous zoom near 13.35
    let bounds = BoundingBox::new(-13_630_000.0, 4_540_000.0, -13_620_000.0, 4_550_000.0);
    let plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    assert_eq!(plan.zoom, plan.continuous_zoom.round() as u32);
    assert_approx_eq!(plan.continuous_zoom, 13.35, 0.01);
    assert_eq!(plan.zoom, 13);
}

#[test]
fn test_double_resolution_keeps_zoom() {
    let bounds = BoundingBox::new(0.0, 0.0, 10_000.0, 5_000.0);
    let normal = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    let double = GridPlan::new(bounds, 668, Resolution::Double).unwrap();
    assert_approx_eq!(normal.continuous_zoom, double.continuous_zoom, 1e-9);
    assert_eq!(double.width_px, 2 * normal.width_px);
}

#[test]
fn test_huge_bounds_clamp_to_zoom_zero() {
    let half = EARTH_CIRCUMFERENCE / 2.0;
    let bounds = BoundingBox::new(-half * 4.0, -half, half * 4.0, half);
    let plan = GridPlan::new(bounds, 100, Resolution::Normal).unwrap();
    assert_eq!(plan.zoom, 0);
    assert_eq!(plan.tiles(), vec![TileCoord::new(0, 0, 0)]);
}

// ============================================================================
// Canvas size
// ============================================================================

#[test]
fn test_height_preserves_aspect() {
    let bounds = BoundingBox::new(0.0, 0.0, 300.0, 200.0);
    let plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    assert_eq!(plan.width_px, 668);
    assert_eq!(plan.height_px, 445);
}

// ============================================================================
// Tile coverage
// ============================================================================

#[test]
fn test_tiles_row_major_from_north_west() {
    // Straddle the origin at zoom 1: all four tiles
    let bounds = BoundingBox::new(-1_000.0, -1_000.0, 1_000.0, 1_000.0);
    let mut plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    plan.zoom = 1;

    assert_eq!(
        plan.tiles(),
        vec![
            TileCoord::new(1, 0, 0),
            TileCoord::new(1, 1, 0),
            TileCoord::new(1, 0, 1),
            TileCoord::new(1, 1, 1),
        ]
    );
}

#[test]
fn test_tiles_cover_every_corner() {
    let bounds = BoundingBox::new(-13_630_000.0, 4_540_000.0, -13_620_000.0, 4_550_000.0);
    let plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    let tiles = plan.tiles();
    assert!(!tiles.is_empty());

    for (x, y) in [
        (bounds.min_x, bounds.min_y),
        (bounds.min_x, bounds.max_y),
        (bounds.max_x, bounds.min_y),
        (bounds.max_x, bounds.max_y),
    ] {
        assert!(
            tiles.iter().any(|t| t.bbox().contains_point(x, y)),
            "corner ({}, {}) not covered",
            x,
            y
        );
    }
}

#[test]
fn test_point_on_tile_boundary_is_covered() {
    // max_x sits exactly on the boundary between columns at zoom 2
    let quarter = EARTH_CIRCUMFERENCE / 4.0;
    let bounds = BoundingBox::new(-quarter - 500.0, 100.0, -quarter, 600.0);
    let mut plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    plan.zoom = 2;

    let ((min_col, max_col), (min_row, max_row)) = plan.tile_ranges();
    assert_eq!((min_col, max_col), (0, 1));
    assert_eq!((min_row, max_row), (1, 1));

    let tiles = plan.tiles();
    assert!(tiles
        .iter()
        .any(|t| t.bbox().contains_point(bounds.max_x, bounds.max_y)));
}

#[test]
fn test_tiles_unique() {
    let bounds = BoundingBox::new(0.0, 0.0, 40_000.0, 30_000.0);
    let plan = GridPlan::new(bounds, 668, Resolution::Normal).unwrap();
    let tiles = plan.tiles();
    let unique: std::collections::HashSet<_> = tiles.iter().collect();
    assert_eq!(unique.len(), tiles.len());
}
