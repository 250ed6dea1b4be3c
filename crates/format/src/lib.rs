//! Pure encode/decode of the on-disk byte layout: header, varints, heap
//! entries, and the per-page slot table. No I/O; everything here operates
//! on byte buffers and offsets the caller already has in hand.

mod error;
pub mod header;
pub mod heap_entry;
pub mod table;
pub mod varint;

pub use error::FormatError;
pub use header::{HeaderMut, HeaderRef, HEADER_SIZE};
pub use heap_entry::HeapEntryRef;
pub use table::SENTINEL;
