//! Tests for fetching tiles from an HTTP tile service.

use basemap::{fetch_layers, FeatureClassifier, HttpTileSource, TileServiceConfig, TileSource};
use preview_common::{LayerKind, PreviewError, TileCoord};
use test_utils::{http, line, square_polygon, tile_json};

// ============================================================================
// Helper functions
// ============================================================================

async fn source_for(status: u16, body: Vec<u8>) -> HttpTileSource {
    let base = http::serve(status, body).await;
    HttpTileSource::new(TileServiceConfig {
        url_template: format!("{}/{{z}}/{{x}}/{{y}}.json", base),
        ..Default::default()
    })
    .unwrap()
}

const COORD: TileCoord = TileCoord { z: 14, x: 2623, y: 6331 };

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_fetch_decodes_tile() {
    let body = tile_json(
        vec![square_polygon(-122.27, 37.80, 0.001, "park")],
        Vec::new(),
        vec![line((-122.28, 37.80), (-122.26, 37.80), "major_road")],
    );
    let source = source_for(200, body.to_string().into_bytes()).await;

    let fetched = source.fetch(COORD).await.unwrap();
    assert_eq!(fetched.coord, COORD);
    assert!(fetched.url.ends_with("/14/2623/6331.json"), "{}", fetched.url);
    assert_eq!(fetched.body.landuse.features.len(), 1);
    assert_eq!(fetched.body.roads.features.len(), 1);

    let layers = fetch_layers(&source, &[COORD], &FeatureClassifier::default())
        .await
        .unwrap();
    assert_eq!(layers.layer(LayerKind::Landuse).len(), 1);
    assert_eq!(layers.layer(LayerKind::Roads).len(), 1);
}

#[tokio::test]
async fn test_server_error_is_tile_fetch_error() {
    let source = source_for(500, b"upstream failure".to_vec()).await;

    let result = source.fetch(COORD).await;
    assert!(matches!(result, Err(PreviewError::TileFetchError { .. })));
}

#[tokio::test]
async fn test_missing_layer_is_tile_fetch_error() {
    let body = br#"{"landuse":{"features":[]},"water":{"features":[]}}"#.to_vec();
    let source = source_for(200, body).await;

    let result = source.fetch(COORD).await;
    assert!(matches!(result, Err(PreviewError::TileFetchError { .. })));
}

#[tokio::test]
async fn test_unreachable_service_is_tile_fetch_error() {
    let base = http::unused_url().await;
    let source = HttpTileSource::new(TileServiceConfig {
        url_template: format!("{}/{{z}}/{{x}}/{{y}}.json", base),
        ..Default::default()
    })
    .unwrap();

    let result = fetch_layers(&source, &[COORD], &FeatureClassifier::default()).await;
    assert!(matches!(result, Err(PreviewError::TileFetchError { .. })));
}
