//! Tests for reading points from CSV and zip sources, local and downloaded.

use ingestion::{read_points, resolve_source, PointIngestor};
use preview_common::{GeoPoint, PreviewError};
use test_utils::{
    csv_text, http, write_csv, write_zip, CSV_HEADER, MIXED_QUALITY_ROWS, OAKLAND_ROWS,
};

// ============================================================================
// CSV sources
// ============================================================================

#[test]
fn test_read_plain_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "oakland.csv", CSV_HEADER, OAKLAND_ROWS);

    let report = read_points(&path).unwrap();
    assert_eq!(report.points.len(), 4);
    assert_eq!(report.points[0], GeoPoint::new(-122.2750, 37.8000));
}

#[test]
fn test_read_mixed_quality_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "mixed.csv", CSV_HEADER, MIXED_QUALITY_ROWS);

    let report = read_points(&path).unwrap();
    assert_eq!(report.rows, 5);
    assert_eq!(report.skipped, 3);
    assert_eq!(
        report.points,
        vec![
            GeoPoint::new(-122.2711, 37.8044),
            GeoPoint::new(-122.2690, 37.8060)
        ]
    );
}

#[test]
fn test_missing_file_is_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_points(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(PreviewError::FetchError(_))));
}

#[test]
fn test_unknown_suffix_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "points.txt", CSV_HEADER, OAKLAND_ROWS);
    assert!(matches!(read_points(&path), Err(PreviewError::FormatError(_))));
}

// ============================================================================
// Zip sources
// ============================================================================

#[test]
fn test_zip_mixed_quality_yields_two_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(
        dir.path(),
        "source.zip",
        &[("us/ca/oakland.csv", csv_text(CSV_HEADER, MIXED_QUALITY_ROWS))],
    );

    let report = read_points(&path).unwrap();
    assert_eq!(report.points.len(), 2);
    assert_eq!(report.skipped, 3);
}

#[test]
fn test_zip_uses_first_csv_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(
        dir.path(),
        "source.zip",
        &[
            ("README.txt", "not a csv".to_string()),
            ("first.csv", csv_text(CSV_HEADER, &OAKLAND_ROWS[..1])),
            ("second.csv", csv_text(CSV_HEADER, OAKLAND_ROWS)),
        ],
    );

    let report = read_points(&path).unwrap();
    assert_eq!(report.points.len(), 1);
}

#[test]
fn test_zip_without_csv_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(
        dir.path(),
        "source.zip",
        &[("data.json", "{}".to_string()), ("upper.CSV", csv_text(CSV_HEADER, OAKLAND_ROWS))],
    );

    assert!(matches!(read_points(&path), Err(PreviewError::FormatError(_))));
}

#[test]
fn test_corrupt_zip_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.zip");
    std::fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();

    assert!(matches!(read_points(&path), Err(PreviewError::FormatError(_))));
}

// ============================================================================
// Ingestor
// ============================================================================

#[tokio::test]
async fn test_ingestor_reads_local_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "oakland.csv", CSV_HEADER, OAKLAND_ROWS);

    let ingestor = PointIngestor::new(None).unwrap();
    let report = ingestor.ingest(path.to_str().unwrap()).await.unwrap();
    assert_eq!(report.points.len(), 4);
}

#[tokio::test]
async fn test_ingestor_rejects_unknown_scheme() {
    let ingestor = PointIngestor::new(None).unwrap();
    let result = ingestor.ingest("ftp://example.com/points.csv").await;
    assert!(matches!(result, Err(PreviewError::InvalidSource(_))));
}

// ============================================================================
// Remote sources
// ============================================================================

fn zipped_mixed_rows() -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let csv = csv_text(CSV_HEADER, MIXED_QUALITY_ROWS);
    let path = write_zip(dir.path(), "source.zip", &[("points.csv", csv)]);
    std::fs::read(path).unwrap()
}

#[tokio::test]
async fn test_ingestor_downloads_zip_source() {
    let base = http::serve(200, zipped_mixed_rows()).await;

    let ingestor = PointIngestor::new(None).unwrap();
    let report = ingestor.ingest(&format!("{}/source.zip", base)).await.unwrap();
    assert_eq!(report.points.len(), 2);
    assert_eq!(report.skipped, 3);
}

#[tokio::test]
async fn test_download_keeps_url_suffix() {
    let base = http::serve(200, zipped_mixed_rows()).await;
    let client = reqwest::Client::new();

    let resolved = resolve_source(&format!("{}/data/source.zip", base), &client)
        .await
        .unwrap();
    assert!(resolved.is_remote());

    let name = resolved.path().file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Preview-"), "{}", name);
    assert!(name.ends_with(".zip"), "{}", name);
    assert!(resolved.path().exists());
}

#[tokio::test]
async fn test_http_error_status_is_fetch_error() {
    let base = http::serve(404, b"missing".to_vec()).await;

    let ingestor = PointIngestor::new(None).unwrap();
    let result = ingestor.ingest(&format!("{}/points.csv", base)).await;
    assert!(matches!(result, Err(PreviewError::FetchError(_))));
}

#[tokio::test]
async fn test_refused_connection_is_fetch_error() {
    let base = http::unused_url().await;

    let ingestor = PointIngestor::new(None).unwrap();
    let result = ingestor.ingest(&format!("{}/points.csv", base)).await;
    assert!(matches!(result, Err(PreviewError::FetchError(_))));
}
