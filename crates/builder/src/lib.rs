//! The offline construction algorithm: given a full key/value input set and
//! a [`Configuration`], chooses page geometry, decides inline vs external
//! storage per entry, and emits the complete file to a [`ByteSink`].
//!
//! No I/O happens in this crate directly — `crates/io` supplies the
//! concrete sinks (`InMemorySink`, `DiskSink`) that satisfy the trait below.

mod config;
mod entry;
mod error;
mod pack;
mod placement;
mod sizing;

use std::collections::HashSet;

use entry::{smallest_first_sort, Entry};

pub use config::Configuration;
pub use error::BuildError;

/// Where a built file's bytes are written.
///
/// `append` extends the sink by the given bytes, starting at its current
/// length. `write_at` overwrites an already-written absolute range — unused
/// by this crate's own build path (sizing fully resolves the header before
/// any bytes are emitted) but part of the trait so a sink can also serve a
/// builder that backpatches, and so `crates/io`'s disk-backed implementation
/// has one consistent contract to satisfy.
pub trait ByteSink {
    fn append(&mut self, bytes: &[u8]) -> std::io::Result<()>;
    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> std::io::Result<()>;
    fn len(&self) -> u64;
}

/// Builds rangekv files from an input set of key/value pairs under a fixed
/// [`Configuration`].
#[derive(Debug, Clone, Copy)]
pub struct Builder {
    config: Configuration,
}

impl Builder {
    pub fn new(config: Configuration) -> Self {
        Builder { config }
    }

    /// Consumes `pairs`, sizes and places the file, and writes it to `sink`.
    ///
    /// `pairs` is drained into an owned, sorted vector before any sizing
    /// decision is made, so the caller's iteration order never leaks into
    /// the output — two calls with the same multiset of pairs and the same
    /// configuration produce byte-identical files.
    pub fn build<S, I>(&self, pairs: I, sink: &mut S) -> Result<(), BuildError>
    where
        S: ByteSink,
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let mut entries = Vec::new();
        let mut seen_keys = HashSet::new();

        for (key, value) in pairs {
            if !seen_keys.insert(key.clone()) {
                return Err(BuildError::DuplicateKey { key_len: key.len() });
            }
            entries.push(Entry::new(key, value));
        }

        smallest_first_sort(&mut entries);

        let (geometry, buckets) = sizing::size(&entries, &self.config)?;
        let file = placement::place(&geometry, &self.config, &buckets)?;
        sink.append(&file)?;
        Ok(())
    }
}
