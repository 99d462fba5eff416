//! Error types for the preview pipeline.

use thiserror::Error;

/// Result type alias using PreviewError.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Primary error type for preview rendering.
///
/// Malformed individual CSV rows never surface here; they are skipped by the
/// ingestor. Every variant aborts the render before any PNG is written.
#[derive(Debug, Error)]
pub enum PreviewError {
    // === Input Errors ===
    #[error("Unsupported source: {0}")]
    InvalidSource(String),

    #[error("Failed to fetch source: {0}")]
    FetchError(String),

    #[error("Invalid format: {0}")]
    FormatError(String),

    // === Data Errors ===
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    // === Tile Service Errors ===
    #[error("Tile fetch failed for {url}: {message}")]
    TileFetchError { url: String, message: String },

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Failed to write output: {0}")]
    Io(String),
}

impl PreviewError {
    /// Short machine-readable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PreviewError::InvalidSource(_) => "InvalidSource",
            PreviewError::FetchError(_) => "FetchError",
            PreviewError::FormatError(_) => "FormatError",
            PreviewError::InsufficientData(_) => "InsufficientData",
            PreviewError::DegenerateBounds(_) => "DegenerateBounds",
            PreviewError::TileFetchError { .. } => "TileFetchError",
            PreviewError::RenderError(_) => "RenderError",
            PreviewError::Io(_) => "Io",
        }
    }

    /// Build a tile error for the given request URL.
    pub fn tile(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        PreviewError::TileFetchError {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

// Reading inputs is the only place plain I/O errors come from; output writes
// are mapped to `Io` explicitly at the call site.
impl From<std::io::Error> for PreviewError {
    fn from(err: std::io::Error) -> Self {
        PreviewError::FetchError(err.to_string())
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        PreviewError::FormatError(format!("JSON error: {}", err))
    }
}
