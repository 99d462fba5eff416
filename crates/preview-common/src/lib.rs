//! Common types and utilities shared across the address preview crates.

pub mod bbox;
pub mod error;
pub mod geometry;
pub mod tile;

pub use bbox::BoundingBox;
pub use error::{PreviewError, PreviewResult};
pub use geometry::{Feature, GeoPoint, Geometry, Layer, LayerKind, ProjectedPoint, Ring};
pub use tile::{GridPlan, Resolution, TileCoord, EARTH_CIRCUMFERENCE, EARTH_RADIUS};
