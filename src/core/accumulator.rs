use crate::config::FieldMapping;
use crate::core::translator::translate;
use crate::domain::model::{Batch, RawRow, BATCH_CAPACITY};
use crate::utils::error::Result;
use std::iter::Fuse;

/// Pulls rows from a source and groups their translations into batches.
pub struct BatchAccumulator<'m, I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    rows: Fuse<I>,
    mapping: &'m FieldMapping,
    capacity: usize,
}

impl<'m, I> BatchAccumulator<'m, I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    pub fn new(rows: I, mapping: &'m FieldMapping) -> Self {
        Self::with_capacity(rows, mapping, BATCH_CAPACITY)
    }

    pub fn with_capacity(rows: I, mapping: &'m FieldMapping, capacity: usize) -> Self {
        Self {
            rows: rows.fuse(),
            mapping,
            capacity: capacity.clamp(1, BATCH_CAPACITY),
        }
    }

    /// Consumes up to `capacity` rows. Returns `Ok(None)` once the source has
    /// nothing left; a returned batch may hold zero records when every row in
    /// it was empty or failed.
    pub fn next_batch(&mut self) -> Result<Option<Batch>> {
        let mut batch = Batch::default();

        for row in self.rows.by_ref().take(self.capacity) {
            let row = row?;
            batch.stats.rows_read += 1;

            if row.is_empty() {
                batch.stats.empty_rows += 1;
                continue;
            }

            match translate(&row, self.mapping) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    batch.stats.failed_rows += 1;
                    tracing::warn!("Failed on row {:?}: {}", row, e);
                }
            }
        }

        if batch.stats.rows_read == 0 {
            return Ok(None);
        }

        tracing::debug!(
            "Accumulated {} records from {} rows",
            batch.len(),
            batch.stats.rows_read
        );
        Ok(Some(batch))
    }
}

impl<I> Iterator for BatchAccumulator<'_, I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch().transpose()
    }
}
