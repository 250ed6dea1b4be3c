//! The read path: given a random-access [`ByteSource`] and a key, resolve
//! the key to its value with one ranged read (two if the entry is stored
//! external).

use std::sync::OnceLock;

use format::header::{HeaderRef, HEADER_SIZE};
use format::heap_entry::{self, HeapEntryRef};
use format::table::{validate_slot, TableRef, SENTINEL};
use format::FormatError;
use hash::Digest;
use thiserror::Error;

/// A random-access source of bytes: a file, an in-memory buffer, or (not
/// implemented in this crate) an HTTP range-request client.
pub trait ByteSource {
    fn read_at(&self, offset: u64, length: u64) -> std::io::Result<Vec<u8>>;
}

/// Errors surfaced while reading an existing file. `NotFound` is not among
/// these — it's a normal [`LookupResult`], not a failure.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error reading from source")]
    Io(#[from] std::io::Error),
}

/// The outcome of a [`Reader::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(Vec<u8>),
    NotFound,
}

#[derive(Debug, Clone, Copy)]
struct HeaderFields {
    page_count: u64,
    heap_bytes: u32,
    table_slots: u32,
}

/// Resolves keys against a single immutable rangekv file.
///
/// The header is read once and cached; after that, every [`Reader::lookup`]
/// issues one ranged read for the target page, plus a second one only if
/// the matching slot turns out to hold an external entry.
#[derive(Debug)]
pub struct Reader<S: ByteSource> {
    source: S,
    header: OnceLock<HeaderFields>,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Reader {
            source,
            header: OnceLock::new(),
        }
    }

    fn header(&self) -> Result<HeaderFields, ReadError> {
        if let Some(fields) = self.header.get() {
            return Ok(*fields);
        }
        let bytes = self.source.read_at(0, HEADER_SIZE as u64)?;
        let view = HeaderRef::new(&bytes)?;
        let fields = HeaderFields {
            page_count: view.page_count()?,
            heap_bytes: view.heap_bytes()?,
            table_slots: view.table_slots()?,
        };
        Ok(*self.header.get_or_init(|| fields))
    }

    /// Resolves `key` to its value, or `NotFound` if it isn't present.
    pub fn lookup(&self, key: &[u8]) -> Result<LookupResult, ReadError> {
        let header = self.header()?;
        let digest = Digest::of(key);

        let page_index = digest.page_index(header.page_count);
        let page_size = header.heap_bytes as u64 + 4 * header.table_slots as u64;
        let page_offset = page_index * page_size;

        let page_bytes = self.source.read_at(page_offset, page_size)?;
        let heap = &page_bytes[0..header.heap_bytes as usize];
        let table = TableRef::new(&page_bytes[header.heap_bytes as usize..], header.table_slots)?;

        let reserved = if page_index == 0 {
            HEADER_SIZE as u32
        } else {
            0
        };

        for slot in digest.probe_sequence(header.table_slots) {
            let raw = table.get(slot)?;
            if raw == SENTINEL {
                return Ok(LookupResult::NotFound);
            }
            validate_slot(raw, header.heap_bytes, reserved)?;

            let (entry, _) = heap_entry::decode(heap, raw as usize)?;
            match entry {
                HeapEntryRef::Internal { key: found_key, value } => {
                    if found_key == key {
                        return Ok(LookupResult::Found(value.to_vec()));
                    }
                }
                HeapEntryRef::External { offset, length } => {
                    let record = self.source.read_at(offset, length)?;
                    let (resolved, _) = heap_entry::decode(&record, 0)?;
                    match resolved {
                        HeapEntryRef::Internal { key: found_key, value } => {
                            if found_key == key {
                                return Ok(LookupResult::Found(value.to_vec()));
                            }
                        }
                        HeapEntryRef::External { .. } => {
                            return Err(FormatError::MalformedHeapEntry {
                                offset: offset as usize,
                                reason: "external pointer resolved to another external stub"
                                    .to_string(),
                            }
                            .into());
                        }
                    }
                }
            }
        }

        Ok(LookupResult::NotFound)
    }
}
