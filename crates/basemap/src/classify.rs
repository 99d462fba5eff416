//! Basemap feature classification.
//!
//! A tile feature lands in a layer only when its geometry type contains the
//! layer's marker ("Polygon" or "LineString") and its `kind` is on the
//! layer's allow-list. Accepted features are projected and appended in fetch
//! order; duplicates across tile edges are kept.

use tracing::{debug, info, instrument};

use preview_common::{Feature, Layer, LayerKind, PreviewError, PreviewResult, TileCoord};
use projection::WebMercator;

use crate::fetch::{FetchedTile, TileSource};
use crate::geojson::TileFeature;

pub const LANDUSE_KINDS: &[&str] = &[
    "cemetery",
    "forest",
    "golf_course",
    "grave_yard",
    "meadow",
    "park",
    "pitch",
    "wood",
];

pub const WATER_KINDS: &[&str] = &["basin", "lake", "ocean", "riverbank", "water"];

pub const ROAD_KINDS: &[&str] = &["highway", "major_road", "minor_road", "rail", "path"];

/// Acceptance rule for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRule {
    pub layer: LayerKind,
    /// Substring the geometry type must contain
    pub geometry_marker: &'static str,
    pub kinds: &'static [&'static str],
}

impl LayerRule {
    pub fn for_layer(layer: LayerKind) -> Self {
        match layer {
            LayerKind::Landuse => Self {
                layer,
                geometry_marker: "Polygon",
                kinds: LANDUSE_KINDS,
            },
            LayerKind::Water => Self {
                layer,
                geometry_marker: "Polygon",
                kinds: WATER_KINDS,
            },
            LayerKind::Roads => Self {
                layer,
                geometry_marker: "LineString",
                kinds: ROAD_KINDS,
            },
        }
    }

    pub fn accepts(&self, feature: &TileFeature) -> bool {
        feature.geometry_type().contains(self.geometry_marker)
            && feature
                .kind()
                .map(|kind| self.kinds.contains(&kind))
                .unwrap_or(false)
    }
}

/// The three classified layers of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct BasemapLayers {
    pub landuse: Layer,
    pub water: Layer,
    pub roads: Layer,
}

impl Default for BasemapLayers {
    fn default() -> Self {
        Self {
            landuse: Layer::new(LayerKind::Landuse),
            water: Layer::new(LayerKind::Water),
            roads: Layer::new(LayerKind::Roads),
        }
    }
}

impl BasemapLayers {
    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Landuse => &self.landuse,
            LayerKind::Water => &self.water,
            LayerKind::Roads => &self.roads,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Landuse => &mut self.landuse,
            LayerKind::Water => &mut self.water,
            LayerKind::Roads => &mut self.roads,
        }
    }

    /// Total features across all layers.
    pub fn len(&self) -> usize {
        self.landuse.len() + self.water.len() + self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filters tile features into layers, projecting what it keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureClassifier {
    projection: WebMercator,
}

impl FeatureClassifier {
    pub fn new(projection: WebMercator) -> Self {
        Self { projection }
    }

    /// Append the accepted features of `tile` to `layers`.
    ///
    /// Returns how many features were accepted. Coordinates that fail to
    /// decode abort with a tile error for the tile's URL.
    pub fn classify_tile(
        &self,
        tile: &FetchedTile,
        layers: &mut BasemapLayers,
    ) -> PreviewResult<usize> {
        let mut accepted = 0;

        for kind in LayerKind::ALL {
            let rule = LayerRule::for_layer(kind);

            for feature in &tile.body.collection(kind).features {
                if !rule.accepts(feature) {
                    continue;
                }
                let Some(geometry) = feature.geometry.as_ref() else {
                    continue;
                };
                let projected = geometry
                    .project(&self.projection)
                    .map_err(|e| PreviewError::tile(tile.url.clone(), e))?;

                if let Some(projected) = projected {
                    // kind is known to be present once the rule accepted it
                    let name = feature.kind().unwrap_or_default();
                    layers.layer_mut(kind).push(Feature::new(projected, name));
                    accepted += 1;
                }
            }
        }

        debug!(url = %tile.url, accepted, "Classified tile");
        Ok(accepted)
    }
}

/// Fetch every tile in order and classify it.
///
/// Tiles are requested one at a time; the first failure aborts.
#[instrument(skip_all, fields(tiles = tiles.len()))]
pub async fn fetch_layers(
    source: &dyn TileSource,
    tiles: &[TileCoord],
    classifier: &FeatureClassifier,
) -> PreviewResult<BasemapLayers> {
    let mut layers = BasemapLayers::default();

    for &coord in tiles {
        let tile = source.fetch(coord).await?;
        classifier.classify_tile(&tile, &mut layers)?;
    }

    info!(
        landuse = layers.landuse.len(),
        water = layers.water.len(),
        roads = layers.roads.len(),
        "Fetched basemap features"
    );
    Ok(layers)
}
