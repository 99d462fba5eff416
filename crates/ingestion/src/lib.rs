//! Address point ingestion.
//!
//! Resolves a local path or remote URL to a readable file and streams the
//! `LON`/`LAT` columns of a CSV (or the first CSV inside a zip archive) into
//! [`GeoPoint`](preview_common::GeoPoint)s. Malformed or out-of-range rows are
//! skipped; structural problems fail the whole ingest.

pub mod ingester;
pub mod points;
pub mod source;

// Re-exports
pub use ingester::PointIngestor;
pub use points::{detect_format, read_points, read_csv_points, IngestReport, SourceFormat};
pub use source::{resolve_source, ResolvedSource};
