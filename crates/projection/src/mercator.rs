//! Spherical Web Mercator projection (EPSG:3857).
//!
//! Maps WGS84 longitude/latitude in degrees onto a plane in meters using a
//! sphere of radius 6378137:
//! - x = lon · π/180 · R
//! - y = R · ln(tan(π/4 + lat · π/360))
//!
//! The transform is a pure function; [`WebMercator`] is a plain `Copy` value
//! so callers can hold one without sharing state.

use std::f64::consts::PI;

use preview_common::{GeoPoint, ProjectedPoint, EARTH_RADIUS};

/// Spherical Web Mercator projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    /// Sphere radius (meters)
    pub radius: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            radius: EARTH_RADIUS,
        }
    }
}

impl WebMercator {
    /// Project longitude/latitude in degrees to meters.
    ///
    /// At the poles the y coordinate diverges; callers receive the raw
    /// (possibly infinite) value.
    pub fn project_lonlat(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = lon * PI / 180.0 * self.radius;
        let y = self.radius * (PI / 4.0 + lat * PI / 360.0).tan().ln();
        (x, y)
    }

    /// Project a geographic point.
    pub fn project(&self, point: GeoPoint) -> ProjectedPoint {
        let (x, y) = self.project_lonlat(point.lon, point.lat);
        ProjectedPoint::new(x, y)
    }

    /// Project a batch of points, preserving order.
    pub fn project_all<I>(&self, points: I) -> Vec<ProjectedPoint>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points.into_iter().map(|p| self.project(p)).collect()
    }
}

/// Project with the standard sphere.
pub fn project(point: GeoPoint) -> ProjectedPoint {
    WebMercator::default().project(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_common::EARTH_CIRCUMFERENCE;

    #[test]
    fn test_origin() {
        let p = project(GeoPoint::new(0.0, 0.0));
        assert_eq!(p.x, 0.0);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_is_half_circumference() {
        let p = project(GeoPoint::new(180.0, 0.0));
        assert!((p.x - EARTH_CIRCUMFERENCE / 2.0).abs() < 1e-6);
        let p = project(GeoPoint::new(-180.0, 0.0));
        assert!((p.x + EARTH_CIRCUMFERENCE / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_square_extent_latitude() {
        // The Web Mercator square ends near 85.0511 degrees
        let p = project(GeoPoint::new(0.0, 85.051_128_779_806_59));
        assert!((p.y - EARTH_CIRCUMFERENCE / 2.0).abs() < 1e-3, "y = {}", p.y);
    }

    #[test]
    fn test_known_city() {
        // San Francisco, checked against EPSG:3857 reference values
        let p = project(GeoPoint::new(-122.4194, 37.7749));
        assert!((p.x - -13_627_361.0).abs() < 1.0, "x = {}", p.x);
        assert!((p.y - 4_547_675.0).abs() < 1.0, "y = {}", p.y);
    }

    #[test]
    fn test_deterministic() {
        let proj = WebMercator::default();
        let a = proj.project(GeoPoint::new(13.4, 52.5));
        let b = proj.project(GeoPoint::new(13.4, 52.5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_monotonic_in_both_axes() {
        let proj = WebMercator::default();
        let mut last = proj.project(GeoPoint::new(-179.0, -89.0));
        for i in 1..=178 {
            let deg = -89.0 + i as f64;
            let p = proj.project(GeoPoint::new(deg, deg.clamp(-89.0, 89.0)));
            assert!(p.x > last.x);
            assert!(p.y > last.y);
            last = p;
        }
    }

    #[test]
    fn test_project_all_keeps_order() {
        let points = vec![GeoPoint::new(1.0, 1.0), GeoPoint::new(-1.0, -1.0)];
        let projected = WebMercator::default().project_all(points);
        assert!(projected[0].x > 0.0);
        assert!(projected[1].x < 0.0);
    }
}
