use thiserror::Error;

/// Errors that can abort a build. On any of these the Builder has written
/// nothing durable to the sink's final position — buffering happens after
/// sizing and placement both succeed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("duplicate key in build input ({key_len} bytes)")]
    DuplicateKey { key_len: usize },

    #[error(
        "no page geometry up to {page_count_ceiling} pages satisfies the configured \
         waste ratio ({max_waste_ratio}) and external ratio ({max_external_ratio}) bounds"
    )]
    ConfigurationInfeasible {
        page_count_ceiling: u64,
        max_waste_ratio: f64,
        max_external_ratio: f64,
    },

    #[error("page {page_index} could not place all of its keys in a table of {table_slots} slots")]
    PlacementFailed { page_index: u64, table_slots: u32 },

    #[error(transparent)]
    Format(#[from] format::FormatError),

    #[error("I/O error writing to sink")]
    Io(#[from] std::io::Error),
}
