//! Coordinate reference system transformations.
//!
//! Implements the spherical Web Mercator projection used for both input
//! points and basemap tile geometry.

pub mod mercator;

pub use mercator::{project, WebMercator};
