//! Basemap support for address previews.
//!
//! - [`geojson`]: the tile service's JSON body (three GeoJSON collections)
//! - [`fetch`]: URL templating and the [`TileSource`] seam with HTTP and
//!   in-memory implementations
//! - [`classify`]: per-layer geometry/kind filtering and projection

pub mod classify;
pub mod fetch;
pub mod geojson;

pub use classify::{fetch_layers, BasemapLayers, FeatureClassifier, LayerRule};
pub use fetch::{
    expand_url, FetchedTile, HttpTileSource, MemoryTileSource, TileServiceConfig, TileSource,
    DEFAULT_TILE_URL,
};
pub use geojson::{TileFeature, TileFeatureCollection, TileGeometry, TileResponse};
