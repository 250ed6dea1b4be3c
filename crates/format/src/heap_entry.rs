//! Encode/decode of the two heap entry variants.
//!
//! An **internal** entry stores the full key and value inline. An
//! **external** entry is a 17-byte stub (`varint 0`, 8-byte offset, 8-byte
//! length) pointing at an internal-form record stored elsewhere in the file
//! (the builder always places these in the tail area past the last page).

use crate::varint;
use crate::FormatError;

/// A decoded heap entry, borrowing from the buffer it was read from.
#[derive(Debug, PartialEq, Eq)]
pub enum HeapEntryRef<'a> {
    Internal { key: &'a [u8], value: &'a [u8] },
    External { offset: u64, length: u64 },
}

/// Encodes an internal (inline) entry: `varint(key_len+1) varint(value_len) key value`.
pub fn encode_internal(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(internal_encoded_len(key.len(), value.len()));
    varint::encode(key.len() as u64 + 1, &mut out);
    varint::encode(value.len() as u64, &mut out);
    out.extend_from_slice(key);
    out.extend_from_slice(value);
    out
}

/// The number of bytes `encode_internal` would emit for a key/value of these lengths.
pub fn internal_encoded_len(key_len: usize, value_len: usize) -> usize {
    varint::encoded_len(key_len as u64 + 1) + varint::encoded_len(value_len as u64) + key_len + value_len
}

/// Encodes an external stub: `varint(0) offset:u64le length:u64le`.
pub fn encode_external(offset: u64, length: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(EXTERNAL_ENCODED_LEN);
    varint::encode(0, &mut out);
    out.extend_from_slice(&offset.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out
}

/// An external stub is always `varint(0)` (1 byte, since 0 <= 240) plus 16 bytes.
pub const EXTERNAL_ENCODED_LEN: usize = 1 + 8 + 8;

/// Decodes the heap entry starting at `offset` in `buf`.
///
/// Returns the entry and the number of bytes it occupied.
pub fn decode(buf: &[u8], offset: usize) -> Result<(HeapEntryRef<'_>, usize), FormatError> {
    let malformed = |reason: &str| FormatError::MalformedHeapEntry {
        offset,
        reason: reason.to_string(),
    };

    let (discriminant, disc_len) = varint::decode(buf, offset)?;

    if discriminant == 0 {
        let body_start = offset + disc_len;
        let body = buf
            .get(body_start..body_start + 16)
            .ok_or_else(|| malformed("truncated external entry"))?;
        let file_offset = u64::from_le_bytes(body[0..8].try_into().unwrap());
        let length = u64::from_le_bytes(body[8..16].try_into().unwrap());
        return Ok((
            HeapEntryRef::External {
                offset: file_offset,
                length,
            },
            disc_len + 16,
        ));
    }

    let key_len = (discriminant - 1) as usize;
    let (value_len, value_len_len) = varint::decode(buf, offset + disc_len)?;
    let value_len = value_len as usize;

    let key_start = offset + disc_len + value_len_len;
    let key = buf
        .get(key_start..key_start + key_len)
        .ok_or_else(|| malformed("truncated key bytes"))?;

    let value_start = key_start + key_len;
    let value = buf
        .get(value_start..value_start + value_len)
        .ok_or_else(|| malformed("truncated value bytes"))?;

    let total = disc_len + value_len_len + key_len + value_len;
    Ok((HeapEntryRef::Internal { key, value }, total))
}
