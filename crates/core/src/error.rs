//! Unified error types for imgid.
//!
//! Every failure is surfaced to the caller. There is no degraded identity.

use std::path::PathBuf;

/// Unified error types for identity derivation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The local path cannot be expressed relative to the reference root.
    #[error("PATH_RESOLUTION: cannot make {} relative to {}", path.display(), root.display())]
    PathResolution { path: PathBuf, root: PathBuf },

    /// The process working directory could not be read.
    #[error("PATH_RESOLUTION: working directory unavailable: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// The filesystem probe for the source failed (missing, unreadable).
    #[error("SOURCE_UNAVAILABLE: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The strategy cannot be applied to this kind of source.
    #[error("UNSUPPORTED_SOURCE: {0}")]
    UnsupportedSource(String),

    /// The source location could not be parsed or decoded.
    #[error("INVALID_LOCATION: {0}")]
    InvalidLocation(String),

    /// The transform configuration could not be serialized.
    #[error("SERIALIZATION: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-readable code, the prefix of the display form.
    pub fn code(&self) -> &'static str {
        match self {
            Error::PathResolution { .. } | Error::CurrentDir(_) => "PATH_RESOLUTION",
            Error::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Error::UnsupportedSource(_) => "UNSUPPORTED_SOURCE",
            Error::InvalidLocation(_) => "INVALID_LOCATION",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}
