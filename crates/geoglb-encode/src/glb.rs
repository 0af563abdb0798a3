//! Binary glTF (GLB) container framing.
//!
//! # Layout
//!
//! - 12-byte header: magic `glTF`, version 2, total length (u32 LE each)
//! - JSON chunk: length, type `JSON`, document padded with spaces to 4 bytes
//! - BIN chunk: length, type `BIN\0`, buffer padded with zeros to 4 bytes

use crate::document::Document;
use crate::error::{EncodeError, EncodeResult};
use crate::pack::pad_to_alignment;

/// `glTF` in little-endian.
pub const MAGIC: u32 = 0x4654_6C67;

/// Container version.
pub const VERSION: u32 = 2;

/// `JSON` chunk type.
pub const CHUNK_JSON: u32 = 0x4E4F_534A;

/// `BIN\0` chunk type.
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Filler for the JSON chunk.
pub const JSON_PADDING: u8 = b' ';

/// Filler for the BIN chunk.
pub const BIN_PADDING: u8 = 0;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_ALIGNMENT: usize = 4;

/// A structural document together with its binary buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Glb {
    pub document: Document,
    /// Buffer 0 contents, without chunk padding.
    pub bin: Vec<u8>,
}

impl Glb {
    /// Frame the document and buffer into container bytes.
    pub fn to_vec(&self) -> EncodeResult<Vec<u8>> {
        let mut json = serde_json::to_vec(&self.document).map_err(|e| EncodeError::Json {
            context: "structural document",
            message: e.to_string(),
        })?;
        pad_to_alignment(&mut json, CHUNK_ALIGNMENT, JSON_PADDING);

        let bin_padded_len = self.bin.len().next_multiple_of(CHUNK_ALIGNMENT);
        let total = HEADER_LEN + CHUNK_HEADER_LEN + json.len() + CHUNK_HEADER_LEN + bin_padded_len;
        let too_large = |_| EncodeError::ContainerTooLarge { length: total };
        let total_u32 = u32::try_from(total).map_err(too_large)?;
        let json_len = u32::try_from(json.len()).map_err(too_large)?;
        let bin_len = u32::try_from(bin_padded_len).map_err(too_large)?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&total_u32.to_le_bytes());

        out.extend_from_slice(&json_len.to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json);

        out.extend_from_slice(&bin_len.to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&self.bin);
        pad_to_alignment(&mut out, CHUNK_ALIGNMENT, BIN_PADDING);

        debug_assert_eq!(out.len(), total);
        Ok(out)
    }

    /// Parse container bytes produced by [`Glb::to_vec`] or any conforming
    /// writer whose document fits the modeled subset.
    pub fn from_slice(data: &[u8]) -> EncodeResult<Self> {
        let magic = read_u32(data, 0, "header")?;
        if magic != MAGIC {
            return Err(invalid("header", format!("bad magic {magic:#010x}")));
        }
        let version = read_u32(data, 4, "header")?;
        if version != VERSION {
            return Err(invalid("header", format!("unsupported version {version}")));
        }
        let total = read_u32(data, 8, "header")? as usize;
        if total != data.len() {
            return Err(invalid(
                "header",
                format!("declared length {total}, actual {}", data.len()),
            ));
        }

        let (json, next) = read_chunk(data, HEADER_LEN, CHUNK_JSON, "json chunk")?;
        let document: Document =
            serde_json::from_slice(json).map_err(|e| EncodeError::Json {
                context: "structural document",
                message: e.to_string(),
            })?;

        let chunk = if next < data.len() {
            read_chunk(data, next, CHUNK_BIN, "bin chunk")?.0
        } else {
            &[]
        };

        let declared = document.buffers.first().map_or(0, |b| b.byte_length);
        if declared > chunk.len() {
            return Err(invalid(
                "bin chunk",
                format!("buffer declares {declared} bytes, chunk holds {}", chunk.len()),
            ));
        }

        Ok(Self {
            document,
            bin: chunk[..declared].to_vec(),
        })
    }
}

fn invalid(context: &'static str, detail: String) -> EncodeError {
    EncodeError::InvalidContainer { context, detail }
}

fn read_u32(data: &[u8], offset: usize, context: &'static str) -> EncodeResult<u32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| invalid(context, format!("truncated at byte {offset}")))
}

/// Read one chunk at `offset`, returning its payload and the next offset.
fn read_chunk<'a>(
    data: &'a [u8],
    offset: usize,
    expected_type: u32,
    context: &'static str,
) -> EncodeResult<(&'a [u8], usize)> {
    let length = read_u32(data, offset, context)? as usize;
    let chunk_type = read_u32(data, offset + 4, context)?;
    if chunk_type != expected_type {
        return Err(invalid(
            context,
            format!("expected chunk type {expected_type:#010x}, got {chunk_type:#010x}"),
        ));
    }
    if !length.is_multiple_of(CHUNK_ALIGNMENT) {
        return Err(invalid(context, format!("length {length} is not 4-byte aligned")));
    }

    let start = offset + CHUNK_HEADER_LEN;
    let payload = data
        .get(start..start + length)
        .ok_or_else(|| invalid(context, format!("{length} bytes overrun the container")))?;
    Ok((payload, start + length))
}
