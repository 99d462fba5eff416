//! Point ingestor combining source resolution and reading.

use std::time::Duration;

use preview_common::{PreviewError, PreviewResult};
use reqwest::Client;
use tracing::{info, instrument};

use crate::points::{read_points, IngestReport};
use crate::source::resolve_source;

/// Reads address points from a local path or http(s) URL.
#[derive(Debug, Clone)]
pub struct PointIngestor {
    client: Client,
}

impl PointIngestor {
    /// Create an ingestor with its own HTTP client.
    ///
    /// `timeout` applies to remote source downloads; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> PreviewResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PreviewError::FetchError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Resolve `source` and read all valid points from it.
    ///
    /// A downloaded source's temporary file is removed once reading finishes.
    #[instrument(skip(self))]
    pub async fn ingest(&self, source: &str) -> PreviewResult<IngestReport> {
        let resolved = resolve_source(source, &self.client).await?;
        let report = read_points(resolved.path())?;

        info!(
            points = report.points.len(),
            skipped = report.skipped,
            remote = resolved.is_remote(),
            "Ingested source"
        );
        Ok(report)
    }
}
