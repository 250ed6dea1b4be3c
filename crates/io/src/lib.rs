//! Concrete [`reader::ByteSource`]/[`builder::ByteSink`] implementations:
//! an in-memory buffer and a disk-backed file using positioned I/O, so the
//! pure builder/reader crates never depend on `std::fs` directly.

mod disk;
mod memory;

pub use disk::{DiskSink, DiskSource};
pub use memory::{InMemorySink, InMemorySource};
