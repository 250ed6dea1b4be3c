use hash::Digest;

/// An owned key/value pair plus its digest, computed once and carried
/// through sizing and placement so both phases agree on page assignment.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub digest: Digest,
}

impl Entry {
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        let digest = Digest::of(&key);
        Entry { key, value, digest }
    }

    /// `key_len + value_len`, the "smallest-first" sort key from the sizing
    /// procedure.
    pub fn raw_size(&self) -> usize {
        self.key.len() + self.value.len()
    }

    pub fn inline_size(&self) -> usize {
        format::heap_entry::internal_encoded_len(self.key.len(), self.value.len())
    }
}

/// Sorts entries ascending by `(key_len + value_len, key)`: the smallest-first
/// schedule, with the key itself as a tie-break so the ordering — and
/// therefore every downstream decision — is fully deterministic.
pub(crate) fn smallest_first_sort(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.raw_size().cmp(&b.raw_size()).then_with(|| a.key.cmp(&b.key)));
}
