//! Error taxonomy for extraction runs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input path does not exist.
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input exists but could not be opened or decoded.
    #[error("cannot read input {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unparsable markup; nothing extracted so far is returned.
    #[error("malformed XML near byte {position}: {source}")]
    MalformedInput {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Contradictory or out-of-range options, rejected before any input is read.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Scan finished without a single record passing the filter.
    #[error("no posts matched the filter criteria ({scanned} records scanned)")]
    NoMatches { scanned: u64 },

    /// Extraction succeeded but the output could not be persisted.
    #[error("extracted {accepted} records but failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        accepted: usize,
        #[source]
        source: io::Error,
    },

    #[error("extraction cancelled after {scanned} records ({accepted} accepted)")]
    Cancelled { scanned: u64, accepted: u64 },
}

impl ExtractError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
