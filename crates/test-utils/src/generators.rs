//! Tile JSON generators.
//!
//! Builds bodies shaped like the vector tile service responses: one
//! GeoJSON feature collection per layer under `landuse`, `water` and `roads`.

use serde_json::{json, Value};

/// A GeoJSON feature with a `kind` property.
pub fn feature(geometry_type: &str, coordinates: Value, kind: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": geometry_type, "coordinates": coordinates },
        "properties": { "kind": kind }
    })
}

/// A closed square polygon ring around (`lon`, `lat`) in degrees.
pub fn square_ring(lon: f64, lat: f64, half: f64) -> Value {
    json!([
        [lon - half, lat - half],
        [lon + half, lat - half],
        [lon + half, lat + half],
        [lon - half, lat + half],
        [lon - half, lat - half]
    ])
}

/// A square polygon feature.
pub fn square_polygon(lon: f64, lat: f64, half: f64, kind: &str) -> Value {
    feature("Polygon", json!([square_ring(lon, lat, half)]), kind)
}

/// A straight two-point line feature.
pub fn line(from: (f64, f64), to: (f64, f64), kind: &str) -> Value {
    feature("LineString", json!([[from.0, from.1], [to.0, to.1]]), kind)
}

/// A FeatureCollection wrapping `features`.
pub fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// A complete tile body.
pub fn tile_json(landuse: Vec<Value>, water: Vec<Value>, roads: Vec<Value>) -> Value {
    json!({
        "landuse": collection(landuse),
        "water": collection(water),
        "roads": collection(roads)
    })
}

/// A tile body with three empty collections.
pub fn empty_tile_json() -> Value {
    tile_json(Vec::new(), Vec::new(), Vec::new())
}
