use crate::entry::Entry;
use crate::pack::plan_page;
use crate::sizing::{partition_budget, reserved_for_page, Geometry};
use crate::{BuildError, Configuration};
use format::header::{encode_header, HEADER_SIZE};
use format::heap_entry::{encode_external, encode_internal};
use format::table::{TableMut, SENTINEL};

/// Runs the placement phase against an already-sized geometry and bucket
/// assignment, producing the complete file bytes: header overlapping page
/// 0's heap, every page's heap and table, then the external tail area.
///
/// `buckets` must be the exact assignment `sizing::size` returned for this
/// geometry — placement recomputes the same smallest-first partition from
/// `config`, and relies on it landing on the same inline/external split.
pub(crate) fn place(
    geometry: &Geometry,
    config: &Configuration,
    buckets: &[Vec<&Entry>],
) -> Result<Vec<u8>, BuildError> {
    let page_size = geometry.heap_bytes as u64 + 4 * geometry.table_slots as u64;
    let total_pages_bytes = geometry.page_count * page_size;
    let budget = partition_budget(config.small_change_bytes, geometry.table_slots);

    let mut pages = vec![0u8; total_pages_bytes as usize];
    let mut tail = Vec::new();
    let tail_base = total_pages_bytes;

    for (page_index, bucket) in buckets.iter().enumerate() {
        let reserved = reserved_for_page(page_index);
        let page_budget = budget.saturating_sub(reserved);
        let plan = plan_page(bucket, page_budget).ok_or(BuildError::PlacementFailed {
            page_index: page_index as u64,
            table_slots: geometry.table_slots,
        })?;

        let page_start = page_index as u64 * page_size;
        let heap_start = page_start as usize;
        let heap_end = heap_start + geometry.heap_bytes as usize;
        let table_end = heap_end + 4 * geometry.table_slots as usize;

        let mut cursor = heap_start + reserved as usize;
        let mut slots: Vec<(u32, &Entry)> = Vec::with_capacity(bucket.len());

        for entry in &bucket[..plan.inline_count] {
            let encoded = encode_internal(&entry.key, &entry.value);
            let offset_in_page = (cursor - heap_start) as u32;
            pages[cursor..cursor + encoded.len()].copy_from_slice(&encoded);
            cursor += encoded.len();
            slots.push((offset_in_page, entry));
        }

        for entry in &bucket[plan.inline_count..] {
            let record = encode_internal(&entry.key, &entry.value);
            let file_offset = tail_base + tail.len() as u64;
            let length = record.len() as u64;
            tail.extend_from_slice(&record);

            let stub = encode_external(file_offset, length);
            let offset_in_page = (cursor - heap_start) as u32;
            pages[cursor..cursor + stub.len()].copy_from_slice(&stub);
            cursor += stub.len();
            slots.push((offset_in_page, entry));
        }

        let mut table = TableMut::new(&mut pages[heap_end..table_end], geometry.table_slots)?;
        table.fill_sentinel()?;

        for (offset, entry) in &slots {
            let mut placed = false;
            for slot in entry.digest.probe_sequence(geometry.table_slots) {
                if table.get(slot)? == SENTINEL {
                    table.set(slot, *offset)?;
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(BuildError::PlacementFailed {
                    page_index: page_index as u64,
                    table_slots: geometry.table_slots,
                });
            }
        }
    }

    let header = encode_header(geometry.page_count, geometry.heap_bytes, geometry.table_slots);
    pages[0..HEADER_SIZE].copy_from_slice(&header);

    let mut file = pages;
    file.extend_from_slice(&tail);
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::smallest_first_sort;
    use crate::sizing::size;

    fn geometry_and_buckets<'a>(
        entries: &'a [Entry],
        config: &Configuration,
    ) -> (Geometry, Vec<Vec<&'a Entry>>) {
        size(entries, config).unwrap()
    }

    #[test]
    fn places_a_single_inline_entry_right_after_the_header() {
        let mut entries = vec![Entry::new(b"hello".to_vec(), b"world".to_vec())];
        smallest_first_sort(&mut entries);
        let config = Configuration::new(4096, 10.0, 0.0);
        let (geometry, buckets) = geometry_and_buckets(&entries, &config);
        let file = place(&geometry, &config, &buckets).unwrap();

        assert_eq!(&file[0..4], b"RKV1");
        let (decoded, _) = format::heap_entry::decode(&file, HEADER_SIZE).unwrap();
        assert_eq!(
            decoded,
            format::HeapEntryRef::Internal {
                key: b"hello",
                value: b"world"
            }
        );
    }

    #[test]
    fn empty_input_produces_an_all_sentinel_table() {
        let entries: Vec<Entry> = Vec::new();
        let config = Configuration::new(4096, 10.0, 0.0);
        let (geometry, buckets) = geometry_and_buckets(&entries, &config);
        let file = place(&geometry, &config, &buckets).unwrap();
        assert_eq!(file.len(), (geometry.heap_bytes + 4 * geometry.table_slots) as usize);
        let table_start = geometry.heap_bytes as usize;
        for i in 0..geometry.table_slots {
            let start = table_start + 4 * i as usize;
            let slot = u32::from_le_bytes(file[start..start + 4].try_into().unwrap());
            assert_eq!(slot, SENTINEL);
        }
    }

    #[test]
    fn large_value_is_placed_in_the_tail_with_a_stub_in_the_page() {
        let mut entries = vec![
            Entry::new(b"small".to_vec(), b"v".to_vec()),
            Entry::new(b"big".to_vec(), vec![0x42u8; 1 << 16]),
        ];
        smallest_first_sort(&mut entries);
        let config = Configuration::new(4096, 100.0, 1.0);
        let (geometry, buckets) = geometry_and_buckets(&entries, &config);
        let file = place(&geometry, &config, &buckets).unwrap();

        let total_pages_bytes =
            geometry.page_count * (geometry.heap_bytes as u64 + 4 * geometry.table_slots as u64);
        assert!(file.len() as u64 > total_pages_bytes);

        let tail = &file[total_pages_bytes as usize..];
        let (decoded, _) = format::heap_entry::decode(tail, 0).unwrap();
        match decoded {
            format::HeapEntryRef::Internal { key, value } => {
                assert_eq!(key, b"big");
                assert_eq!(value.len(), 1 << 16);
            }
            _ => panic!("expected internal record in tail"),
        }

        // The external stub lives in the heap alongside the inline entries;
        // heap_bytes must cover it or the reader rejects the slot as
        // out-of-range instead of following it into the tail.
        struct Source<'a>(&'a [u8]);
        impl reader::ByteSource for Source<'_> {
            fn read_at(&self, offset: u64, length: u64) -> std::io::Result<Vec<u8>> {
                let start = offset as usize;
                Ok(self.0[start..start + length as usize].to_vec())
            }
        }
        let r = reader::Reader::new(Source(&file));
        assert_eq!(
            r.lookup(b"small").unwrap(),
            reader::LookupResult::Found(b"v".to_vec())
        );
        assert_eq!(
            r.lookup(b"big").unwrap(),
            reader::LookupResult::Found(vec![0x42u8; 1 << 16])
        );
    }
}
