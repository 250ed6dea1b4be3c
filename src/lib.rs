//! # rangekv
//!
//! A read-optimized, immutable, content-addressable key→value file format
//! and the offline builder that produces it.
//!
//! The crate is composed of small leaf components organized under the
//! `/crates` directory of this workspace, in dependency order:
//!
//! - [`hash`]: the 128-bit digest and open-addressing probe sequence shared
//!   by the builder and the reader.
//! - [`format`]: pure encode/decode of the on-disk byte layout (header,
//!   varints, heap entries, table slots).
//! - [`builder`]: the offline construction algorithm — sizing and
//!   placement — that turns a key/value set into a file.
//! - [`reader`]: the read path — one or two ranged reads resolve a key to
//!   its value.
//! - [`io`]: concrete [`reader::ByteSource`]/[`builder::ByteSink`]
//!   implementations (in-memory and disk-backed).
//!
//! This crate re-exports the pieces most callers need; `apps/rangekv-cli`
//! and `apps/rangekv-inspect` wrap them with a command-line interface,
//! configuration loading, and logging.

pub use builder::{BuildError, Builder, Configuration};
pub use format::FormatError;
pub use hash::Digest;
pub use io::{DiskSink, DiskSource, InMemorySink, InMemorySource};
pub use reader::{ByteSource, LookupResult, ReadError, Reader};
