//! Error type shared by the fetch, extract, metadata and freshness stages.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of one pipeline stage. Nothing is retried; the first error halts the run.
#[derive(Debug, Error)]
pub enum OsfError {
    /// Server declared a nonzero `Content-Length` and a different number of bytes was written.
    #[error("download from {url} incomplete: wrote {written} of {declared} bytes")]
    DownloadIncomplete {
        url: String,
        declared: u64,
        written: u64,
    },

    /// Archive is malformed, holds an unsafe entry, or an entry could not be written.
    #[error("failed to extract {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    /// Metadata did not contain exactly one `Updated` date.
    #[error("expected exactly one Updated date in metadata for {url}, found {found}")]
    MetadataAmbiguous { url: String, found: usize },

    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    #[error("transfer from {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata from {url} is not valid DataCite JSON: {source}")]
    Metadata {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("remote date {value:?} is not YYYY-MM-DD: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// No local entries to take a newest modification time from.
    #[error("{} is empty; nothing to compare against", .path.display())]
    EmptyDirectory { path: PathBuf },

    #[error("invalid resource key {key:?}")]
    InvalidKey { key: String },
}

impl OsfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OsfError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        OsfError::Extraction {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn transfer(url: &str, source: curl::Error) -> Self {
        OsfError::Transfer {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OsfError>;
