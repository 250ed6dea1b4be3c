use crate::entry::Entry;
use crate::pack::plan_page;
use crate::{BuildError, Configuration};
use binary_helpers::conversions::UsizeConversion;
use format::heap_entry::EXTERNAL_ENCODED_LEN;
use format::HEADER_SIZE;

/// The load factor the table-slot search targets: `table_slots >= ceil(load / LOAD_FACTOR)`.
pub(crate) const LOAD_FACTOR: f64 = 0.75;

/// Upper bound on the page count the sizing search will try before giving up.
///
/// Not specified by the base format; chosen so even a 64k-key input at a
/// small `small_change_bytes` terminates the search quickly, while staying
/// far above any page count a real deployment would need (a 64k-page file
/// at a 4 KiB page size is already 256 MiB).
pub(crate) const PAGE_COUNT_CEILING: u64 = 65536;

/// The final page geometry chosen by the sizing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub page_count: u64,
    pub heap_bytes: u32,
    pub table_slots: u32,
}

fn next_power_of_two(n: u64) -> u32 {
    if n <= 1 {
        return 1;
    }
    let mut p: u64 = 1;
    while p < n {
        p <<= 1;
    }
    // table_slots is a u32 field; PAGE_COUNT_CEILING-bounded inputs keep this well under u32::MAX.
    p as u32
}

/// Raw payload bytes: `sum(key_len + value_len + minimal varint overhead)`,
/// i.e. what every key/value would cost if stored inline with no padding and
/// no table at all.
pub(crate) fn raw_payload_bytes(entries: &[Entry]) -> u64 {
    entries.iter().map(|e| e.inline_size() as u64).sum()
}

/// The per-page inline/external decision budget for a candidate `table_slots`:
/// what's left of `small_change_bytes` after the table, clamped at zero.
///
/// This is a *decision* budget, not the final `heap_bytes` — it bounds which
/// entries are eligible to be inlined so one ranged read stays close to
/// `small_change_bytes`. The actual heap size used in the file is the real
/// bytes consumed by whichever entries end up inline (see `heap_usage`
/// below), which is frequently much smaller for sparse pages.
pub(crate) fn partition_budget(small_change_bytes: u32, table_slots: u32) -> u32 {
    (small_change_bytes as i64 - 4 * table_slots as i64).max(0) as u32
}

pub(crate) fn reserved_for_page(page_index: usize) -> u32 {
    if page_index == 0 {
        HEADER_SIZE as u32
    } else {
        0
    }
}

/// Buckets `entries` (already sorted smallest-first) by `digest.page_index`,
/// preserving relative order within each bucket.
pub(crate) fn bucket_by_page(entries: &[Entry], page_count: u64) -> Vec<Vec<&Entry>> {
    let mut buckets: Vec<Vec<&Entry>> = vec![Vec::new(); page_count as usize];
    for e in entries {
        let page = e.digest.page_index(page_count) as usize;
        buckets[page].push(e);
    }
    buckets
}

/// Attempts a candidate `page_count`. Returns the geometry plus the
/// per-page bucket assignment if all three configuration constraints are
/// satisfied, so `placement` doesn't have to recompute the buckets.
fn try_page_count<'a>(
    entries: &'a [Entry],
    config: &Configuration,
    page_count: u64,
    raw_payload: u64,
) -> Option<(Geometry, Vec<Vec<&'a Entry>>)> {
    let buckets = bucket_by_page(entries, page_count);
    let max_load = buckets.iter().map(|b| b.len() as u64).max().unwrap_or(0);
    let table_slots = next_power_of_two((max_load as f64 / LOAD_FACTOR).ceil() as u64);

    let budget = partition_budget(config.small_change_bytes, table_slots);

    let mut total_external = 0u64;
    let mut tail_bytes = 0u64;
    let mut heap_bytes: u32 = 0;

    for (page_index, bucket) in buckets.iter().enumerate() {
        let reserved = reserved_for_page(page_index);
        let page_budget = budget.saturating_sub(reserved);
        let plan = plan_page(bucket, page_budget)?;

        let inline_bytes: usize = bucket[..plan.inline_count].iter().map(|e| e.inline_size()).sum();
        let external_count = bucket.len() - plan.inline_count;
        let stub_bytes = external_count * EXTERNAL_ENCODED_LEN;
        let page_heap_usage = (reserved as usize + inline_bytes + stub_bytes).to_u32().ok()?;
        heap_bytes = heap_bytes.max(page_heap_usage);

        total_external += external_count as u64;
        for e in &bucket[plan.inline_count..] {
            tail_bytes += e.inline_size() as u64;
        }
    }

    let total_emitted = page_count * (heap_bytes as u64 + 4 * table_slots as u64) + tail_bytes;

    let waste_ok = raw_payload == 0
        || total_emitted as f64 <= (1.0 + config.max_waste_ratio) * raw_payload as f64;

    let total_keys = entries.len() as u64;
    let external_fraction = if total_keys == 0 {
        0.0
    } else {
        total_external as f64 / total_keys as f64
    };
    let external_ok = external_fraction <= config.max_external_ratio;

    if waste_ok && external_ok {
        Some((
            Geometry {
                page_count,
                heap_bytes,
                table_slots,
            },
            buckets,
        ))
    } else {
        None
    }
}

/// Runs the sizing phase: searches `page_count` from 1 upward for the
/// smallest geometry satisfying the footprint target and the waste/external
/// ratio bounds.
pub(crate) fn size<'a>(
    entries: &'a [Entry],
    config: &Configuration,
) -> Result<(Geometry, Vec<Vec<&'a Entry>>), BuildError> {
    let raw_payload = raw_payload_bytes(entries);

    for page_count in 1..=PAGE_COUNT_CEILING {
        if let Some(result) = try_page_count(entries, config, page_count, raw_payload) {
            return Ok(result);
        }
    }

    Err(BuildError::ConfigurationInfeasible {
        page_count_ceiling: PAGE_COUNT_CEILING,
        max_waste_ratio: config.max_waste_ratio,
        max_external_ratio: config.max_external_ratio,
    })
}
