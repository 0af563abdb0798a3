//! Error types for the geoglb crate.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for geoglb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing an asset.
#[derive(Debug)]
pub enum Error {
    /// Mesh generation, packing or container encoding failed.
    Encode(geoglb_encode::EncodeError),
    /// Destination could not be written; nothing was left behind.
    Write {
        /// The destination that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A sidecar document could not be serialized.
    Serialize {
        /// Which document failed.
        context: &'static str,
        /// The error message.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Encode(e) => write!(f, "encode error: {e}"),
            Error::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            Error::Serialize { context, message } => {
                write!(f, "failed to serialize {context}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(e) => Some(e),
            Error::Write { source, .. } => Some(source),
            Error::Serialize { .. } => None,
        }
    }
}

impl From<geoglb_encode::EncodeError> for Error {
    fn from(e: geoglb_encode::EncodeError) -> Self {
        Error::Encode(e)
    }
}
