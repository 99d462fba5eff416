//! Tile fetching.
//!
//! [`TileSource`] is the seam between the pipeline and the vector tile
//! service. [`HttpTileSource`] issues one GET per tile; [`MemoryTileSource`]
//! serves canned bodies for offline runs and tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use preview_common::{PreviewError, PreviewResult, TileCoord};

use crate::geojson::TileResponse;

/// Default vector tile endpoint.
pub const DEFAULT_TILE_URL: &str =
    "http://tile.mapzen.com/mapzen/vector/v1/all/{z}/{x}/{y}.json{?api_key}";

/// Query expression expanded to `?api_key=...` when a key is configured.
const API_KEY_QUERY: &str = "{?api_key}";

/// Tile service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TileServiceConfig {
    /// URL template with `{z}`, `{x}`, `{y}` and optionally `{?api_key}` or
    /// `{api_key}` placeholders
    pub url_template: String,
    /// API key substituted into the template
    pub api_key: Option<String>,
    /// HTTP request timeout (none by default)
    pub timeout: Option<Duration>,
}

impl Default for TileServiceConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Expand a tile URL template for one tile.
pub fn expand_url(template: &str, coord: TileCoord, api_key: Option<&str>) -> PreviewResult<Url> {
    let key = api_key.filter(|k| !k.is_empty());
    let wants_query = template.contains(API_KEY_QUERY);

    let expanded = template
        .replace(API_KEY_QUERY, "")
        .replace("{z}", &coord.z.to_string())
        .replace("{x}", &coord.x.to_string())
        .replace("{y}", &coord.y.to_string())
        .replace("{api_key}", key.unwrap_or(""));

    let mut url = Url::parse(&expanded)
        .map_err(|e| PreviewError::tile(expanded.clone(), format!("invalid tile URL: {}", e)))?;

    if let (true, Some(key)) = (wants_query, key) {
        url.query_pairs_mut().append_pair("api_key", key);
    }
    Ok(url)
}

/// A fetched and decoded tile.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTile {
    pub coord: TileCoord,
    /// Where the tile came from, for diagnostics
    pub url: String,
    pub body: TileResponse,
}

/// Something that can produce tile bodies.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Fetch one tile. Any failure aborts the render.
    async fn fetch(&self, coord: TileCoord) -> PreviewResult<FetchedTile>;
}

/// Vector tiles over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTileSource {
    client: Client,
    config: TileServiceConfig,
}

impl HttpTileSource {
    /// Create a tile source with its own HTTP client.
    pub fn new(config: TileServiceConfig) -> PreviewResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            PreviewError::tile(config.url_template.clone(), format!("client setup: {}", e))
        })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    async fn fetch(&self, coord: TileCoord) -> PreviewResult<FetchedTile> {
        let url = expand_url(
            &self.config.url_template,
            coord,
            self.config.api_key.as_deref(),
        )?;
        debug!(url = %url, "Getting tile");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PreviewError::tile(url.as_str(), e))?;

        let body = response
            .json::<TileResponse>()
            .await
            .map_err(|e| PreviewError::tile(url.as_str(), e))?;

        Ok(FetchedTile {
            coord,
            url: url.to_string(),
            body,
        })
    }
}

/// Tiles served from memory.
///
/// Coordinates without an entry get the fallback body if one is set and fail
/// otherwise. Requests are recorded in order.
#[derive(Debug, Default)]
pub struct MemoryTileSource {
    tiles: HashMap<TileCoord, TileResponse>,
    fallback: Option<TileResponse>,
    requested: Mutex<Vec<TileCoord>>,
}

impl MemoryTileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for every tile without its own entry.
    pub fn with_fallback(mut self, body: TileResponse) -> Self {
        self.fallback = Some(body);
        self
    }

    pub fn with_tile(mut self, coord: TileCoord, body: TileResponse) -> Self {
        self.tiles.insert(coord, body);
        self
    }

    /// Tiles requested so far, in request order.
    pub fn requested(&self) -> Vec<TileCoord> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TileSource for MemoryTileSource {
    async fn fetch(&self, coord: TileCoord) -> PreviewResult<FetchedTile> {
        let url = format!("memory://{}/{}/{}", coord.z, coord.x, coord.y);
        debug!(url = %url, "Getting tile");

        if let Ok(mut requested) = self.requested.lock() {
            requested.push(coord);
        }

        let body = self
            .tiles
            .get(&coord)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| PreviewError::tile(url.clone(), "no such tile"))?;

        Ok(FetchedTile { coord, url, body })
    }
}
