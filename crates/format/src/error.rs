use thiserror::Error;

/// Errors raised while decoding (or, in a few cases, encoding) the on-disk
/// byte layout. Pure decode errors — nothing here ever performs I/O.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("header magic mismatch or truncated header (expected {expected} bytes, got {actual})")]
    MalformedHeader { expected: usize, actual: usize },

    #[error("heap entry at offset {offset} is malformed: {reason}")]
    MalformedHeapEntry { offset: usize, reason: String },

    #[error("table slot value {slot} lies outside the valid heap range [{min}, {heap_bytes})")]
    SlotOutOfRange {
        slot: u32,
        min: u32,
        heap_bytes: u32,
    },

    #[error(transparent)]
    Binary(#[from] binary_helpers::bin_error::BinaryError),
}
