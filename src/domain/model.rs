use serde::{Deserialize, Serialize};

/// One input record as read from the delimited file, in column order.
pub type RawRow = Vec<String>;

/// Upper bound on the source rows consumed per bulk request.
pub const BATCH_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// The indexed trip document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NormalizedRecord {
    pub dropoff_time: String,
    pub pickup_time: String,
    pub start_block: String,
    pub start_tract: String,
    pub start_county: String,
    pub end_block: String,
    pub end_tract: String,
    pub end_county: String,
    pub start_coords: Position,
    pub end_coords: Position,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub rows_read: usize,
    pub empty_rows: usize,
    pub failed_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub records: Vec<NormalizedRecord>,
    pub stats: BatchStats,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub rows_read: usize,
    pub empty_rows: usize,
    pub failed_rows: usize,
    pub documents_encoded: usize,
    pub encode_failures: usize,
    pub batches_uploaded: usize,
    pub batches_rejected: usize,
    pub batches_failed: usize,
}

impl RunSummary {
    pub fn absorb(&mut self, stats: &BatchStats) {
        self.batches += 1;
        self.rows_read += stats.rows_read;
        self.empty_rows += stats.empty_rows;
        self.failed_rows += stats.failed_rows;
    }
}
