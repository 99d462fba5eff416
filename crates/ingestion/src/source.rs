//! Source resolution: local paths pass through, http(s) URLs are downloaded
//! to a temporary file.

use std::path::{Path, PathBuf};

use preview_common::{PreviewError, PreviewResult};
use reqwest::{Client, Url};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// A source file that can be read from the local filesystem.
///
/// Downloaded sources keep their temporary file alive until dropped.
#[derive(Debug)]
pub enum ResolvedSource {
    Local(PathBuf),
    Downloaded(NamedTempFile),
}

impl ResolvedSource {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedSource::Local(path) => path,
            ResolvedSource::Downloaded(file) => file.path(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ResolvedSource::Downloaded(_))
    }
}

/// How a source string should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceLocation {
    Local(PathBuf),
    Remote(Url),
}

fn classify(source: &str) -> PreviewResult<SourceLocation> {
    if source.is_empty() {
        return Ok(SourceLocation::Local(PathBuf::new()));
    }

    let url = match Url::parse(source) {
        Ok(url) => url,
        // Bare paths have no scheme
        Err(_) => return Ok(SourceLocation::Local(PathBuf::from(source))),
    };

    match url.scheme() {
        "file" => url
            .to_file_path()
            .map(SourceLocation::Local)
            .map_err(|_| PreviewError::InvalidSource(format!("Bad file URL: {}", source))),
        "http" | "https" => Ok(SourceLocation::Remote(url)),
        // Windows drive letters parse as one-letter schemes
        scheme if scheme.len() == 1 => Ok(SourceLocation::Local(PathBuf::from(source))),
        _ => Err(PreviewError::InvalidSource(format!(
            "Unknown URL type: {}",
            source
        ))),
    }
}

/// Suffix (with leading dot) of the last path segment of a URL.
fn url_suffix(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Resolve `source` to a readable local file, downloading remote sources.
#[instrument(skip(client))]
pub async fn resolve_source(source: &str, client: &Client) -> PreviewResult<ResolvedSource> {
    match classify(source)? {
        SourceLocation::Local(path) => Ok(ResolvedSource::Local(path)),
        SourceLocation::Remote(url) => download(url, client).await,
    }
}

async fn download(url: Url, client: &Client) -> PreviewResult<ResolvedSource> {
    info!(url = %url, "Downloading source");

    let response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| PreviewError::FetchError(format!("{}: {}", url, e)))?;

    let body = response
        .bytes()
        .await
        .map_err(|e| PreviewError::FetchError(format!("{}: {}", url, e)))?;

    let file = tempfile::Builder::new()
        .prefix("Preview-")
        .suffix(&url_suffix(&url))
        .tempfile()?;
    tokio::fs::write(file.path(), &body).await?;

    debug!(path = %file.path().display(), bytes = body.len(), "Saved source");
    Ok(ResolvedSource::Downloaded(file))
}
