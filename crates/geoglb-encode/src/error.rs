//! Error types for mesh generation and container encoding.

use std::fmt;

/// Errors that can occur while generating, packing or encoding an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Sphere segment counts must both be at least one.
    InvalidTessellation { lat_segments: u32, lon_segments: u32 },
    /// Generated vertex count does not fit 16-bit indices.
    IndexOverflow { vertex_count: u64 },
    /// Non-finite coordinate or non-positive size.
    DegenerateInput {
        context: &'static str,
        detail: String,
    },
    /// Byte slice is not a well-formed binary container.
    InvalidContainer {
        context: &'static str,
        detail: String,
    },
    /// Structural document could not be (de)serialized.
    Json {
        context: &'static str,
        message: String,
    },
    /// Container length does not fit the 32-bit header field.
    ContainerTooLarge { length: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTessellation {
                lat_segments,
                lon_segments,
            } => {
                write!(
                    f,
                    "invalid tessellation: {lat_segments} latitude x {lon_segments} longitude segments"
                )
            }
            Self::IndexOverflow { vertex_count } => {
                write!(
                    f,
                    "{vertex_count} vertices exceed the {} addressable by u16 indices",
                    crate::mesh::MAX_VERTICES
                )
            }
            Self::DegenerateInput { context, detail } => {
                write!(f, "degenerate {context}: {detail}")
            }
            Self::InvalidContainer { context, detail } => {
                write!(f, "invalid container {context}: {detail}")
            }
            Self::Json { context, message } => {
                write!(f, "failed to process {context} json: {message}")
            }
            Self::ContainerTooLarge { length } => {
                write!(f, "container of {length} bytes exceeds the u32 length field")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
