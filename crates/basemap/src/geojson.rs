//! Vector tile response types.
//!
//! A tile body carries one GeoJSON FeatureCollection per basemap layer, with
//! coordinates in WGS84 degrees:
//!
//! ```json
//! { "landuse": { "type": "FeatureCollection", "features": [...] },
//!   "water":   { ... },
//!   "roads":   { ... } }
//! ```
//!
//! Geometry coordinates are kept as raw JSON until a feature passes
//! classification, so unsupported geometry types never fail a tile.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use preview_common::{Geometry, LayerKind, PreviewError, PreviewResult, ProjectedPoint, Ring};
use projection::WebMercator;

/// A decoded tile body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileResponse {
    pub landuse: TileFeatureCollection,
    pub water: TileFeatureCollection,
    pub roads: TileFeatureCollection,
}

impl TileResponse {
    /// The collection for a basemap layer.
    pub fn collection(&self, kind: LayerKind) -> &TileFeatureCollection {
        match kind {
            LayerKind::Landuse => &self.landuse,
            LayerKind::Water => &self.water,
            LayerKind::Roads => &self.roads,
        }
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileFeatureCollection {
    #[serde(default)]
    pub features: Vec<TileFeature>,
}

/// A GeoJSON Feature as served by the tile service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileFeature {
    /// Null geometries are allowed by GeoJSON and never classified.
    pub geometry: Option<TileGeometry>,

    #[serde(default)]
    pub properties: TileProperties,
}

impl TileFeature {
    /// The `kind` property, if present.
    pub fn kind(&self) -> Option<&str> {
        self.properties.kind.as_deref()
    }

    /// The geometry `type` member, or an empty string for null geometry.
    pub fn geometry_type(&self) -> &str {
        self.geometry.as_ref().map(|g| g.type_.as_str()).unwrap_or("")
    }
}

/// Feature properties; only `kind` is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A GeoJSON geometry with undecoded coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileGeometry {
    /// Type identifier, e.g. "Polygon" or "MultiLineString".
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub coordinates: Value,
}

type Position = Vec<f64>;

impl TileGeometry {
    /// Decode and project the coordinates.
    ///
    /// Returns `Ok(None)` for geometry types the preview does not draw
    /// (MultiPoint, GeometryCollection, ...).
    pub fn project(&self, proj: &WebMercator) -> PreviewResult<Option<Geometry>> {
        let geometry = match self.type_.as_str() {
            "Point" => Geometry::Point(project_position(&self.decode::<Position>()?, proj)?),
            "LineString" => {
                Geometry::LineString(project_ring(&self.decode::<Vec<Position>>()?, proj)?)
            }
            "Polygon" => {
                Geometry::Polygon(project_rings(&self.decode::<Vec<Vec<Position>>>()?, proj)?)
            }
            "MultiLineString" => Geometry::MultiLineString(project_rings(
                &self.decode::<Vec<Vec<Position>>>()?,
                proj,
            )?),
            "MultiPolygon" => Geometry::MultiPolygon(
                self.decode::<Vec<Vec<Vec<Position>>>>()?
                    .iter()
                    .map(|polygon| project_rings(polygon, proj))
                    .collect::<PreviewResult<_>>()?,
            ),
            _ => return Ok(None),
        };
        Ok(Some(geometry))
    }

    fn decode<T: serde::de::DeserializeOwned>(&self) -> PreviewResult<T> {
        T::deserialize(&self.coordinates).map_err(|e| {
            PreviewError::FormatError(format!("Invalid {} coordinates: {}", self.type_, e))
        })
    }
}

fn project_position(position: &[f64], proj: &WebMercator) -> PreviewResult<ProjectedPoint> {
    match position {
        [lon, lat, ..] => {
            let (x, y) = proj.project_lonlat(*lon, *lat);
            Ok(ProjectedPoint::new(x, y))
        }
        _ => Err(PreviewError::FormatError(format!(
            "Position needs at least two values, got {}",
            position.len()
        ))),
    }
}

fn project_ring(positions: &[Position], proj: &WebMercator) -> PreviewResult<Ring> {
    positions.iter().map(|p| project_position(p, proj)).collect()
}

fn project_rings(rings: &[Vec<Position>], proj: &WebMercator) -> PreviewResult<Vec<Ring>> {
    rings.iter().map(|ring| project_ring(ring, proj)).collect()
}
