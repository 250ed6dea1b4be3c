use std::io;

use builder::ByteSink;
use reader::ByteSource;

/// An in-memory [`ByteSource`] over an owned buffer, for tests and callers
/// that already hold the whole file in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    bytes: Vec<u8>,
}

impl InMemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        InMemorySource { bytes }
    }
}

impl ByteSource for InMemorySource {
    fn read_at(&self, offset: u64, length: u64) -> io::Result<Vec<u8>> {
        let start = offset as usize;
        let end = start
            .checked_add(length as usize)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "range overflow"))?;
        self.bytes.get(start..end).map(|s| s.to_vec()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("range {start}..{end} out of bounds for {}-byte buffer", self.bytes.len()),
            )
        })
    }
}

/// An in-memory [`ByteSink`] that accumulates into an owned buffer.
#[derive(Debug, Default)]
pub struct InMemorySink {
    bytes: Vec<u8>,
}

impl InMemorySink {
    pub fn new() -> Self {
        InMemorySink::default()
    }

    /// Consumes the sink, returning the bytes written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteSink for InMemorySink {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> io::Result<()> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        self.bytes[start..end].copy_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }
}
