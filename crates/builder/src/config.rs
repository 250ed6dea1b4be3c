/// Build-time-only parameters controlling page geometry and the
/// inline/external and waste trade-offs the sizing phase searches over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    /// Target combined page size (`heap_bytes + 4 * table_slots`) — the "one
    /// ranged read" budget.
    pub small_change_bytes: u32,
    /// Upper bound on `(emitted_bytes - raw_payload_bytes) / raw_payload_bytes`.
    pub max_waste_ratio: f64,
    /// Upper bound on the fraction of keys resolved via a second (external) read.
    pub max_external_ratio: f64,
}

impl Configuration {
    pub fn new(small_change_bytes: u32, max_waste_ratio: f64, max_external_ratio: f64) -> Self {
        Configuration {
            small_change_bytes,
            max_waste_ratio,
            max_external_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_stores_fields_verbatim() {
        let c = Configuration::new(4096, 0.5, 0.05);
        assert_eq!(c.small_change_bytes, 4096);
        assert_eq!(c.max_waste_ratio, 0.5);
        assert_eq!(c.max_external_ratio, 0.05);
    }
}
