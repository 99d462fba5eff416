//! Point, geometry and layer types for the preview pipeline.
//!
//! Input points arrive as [`GeoPoint`] (degrees) and everything downstream of
//! the projector works in [`ProjectedPoint`] (Web Mercator meters).

use serde::{Deserialize, Serialize};

/// A raw input location in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// True when both coordinates fall inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A projected location in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An ordered ring or line of projected points.
pub type Ring = Vec<ProjectedPoint>;

/// Projected feature geometry.
///
/// Polygon rings are ordered with the exterior ring first and holes after it.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(ProjectedPoint),
    LineString(Ring),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    MultiLineString(Vec<Ring>),
}

impl Geometry {
    /// GeoJSON-style type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::MultiLineString(_) => "MultiLineString",
        }
    }
}

/// A classified, projected basemap feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub kind: String,
}

impl Feature {
    pub fn new(geometry: Geometry, kind: impl Into<String>) -> Self {
        Self {
            geometry,
            kind: kind.into(),
        }
    }
}

/// The three basemap layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Landuse,
    Water,
    Roads,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Landuse, LayerKind::Water, LayerKind::Roads];
}

/// An append-only, fetch-ordered sequence of features.
///
/// Features repeated across tile boundaries are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    kind: LayerKind,
    features: Vec<Feature>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            features: Vec::new(),
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
