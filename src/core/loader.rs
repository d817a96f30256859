use crate::config::FieldMapping;
use crate::core::accumulator::BatchAccumulator;
use crate::core::encoder::encode;
use crate::domain::model::{RawRow, RunSummary};
use crate::domain::ports::BulkUploader;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives the read → translate → encode → upload loop until the row source is
/// exhausted. Batches are processed strictly one at a time, in input order.
///
/// Row, record, and batch failures are logged and counted in the returned
/// [`RunSummary`]; only a failure to read the source itself ends the run
/// with an error. Nothing is retried.
pub struct TripLoader<'m, U: BulkUploader> {
    mapping: &'m FieldMapping,
    uploader: U,
    dry_run: bool,
    monitor: SystemMonitor,
}

impl<'m, U: BulkUploader> TripLoader<'m, U> {
    pub fn new(mapping: &'m FieldMapping, uploader: U) -> Self {
        Self {
            mapping,
            uploader,
            dry_run: false,
            monitor: SystemMonitor::default(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    pub async fn run<I>(&self, rows: I) -> Result<RunSummary>
    where
        I: Iterator<Item = Result<RawRow>>,
    {
        let mut summary = RunSummary::default();
        let mut batches = BatchAccumulator::new(rows, self.mapping);

        while let Some(batch) = batches.next_batch()? {
            summary.absorb(&batch.stats);
            let batch_number = summary.batches;
            self.monitor.log_batch(batch_number);
            tracing::info!(
                "Beginning bulk {} with {} items ({} rows read, {} failed)",
                batch_number,
                batch.len(),
                batch.stats.rows_read,
                batch.stats.failed_rows
            );

            let encoded = encode(&batch.records);
            summary.documents_encoded += encoded.documents;
            summary.encode_failures += encoded.skipped;

            if encoded.is_empty() {
                tracing::info!("Bulk {} has no documents, not sending", batch_number);
                continue;
            }

            if self.dry_run {
                tracing::info!(
                    "🔍 Dry run: would send bulk {} with {} documents ({} bytes)",
                    batch_number,
                    encoded.documents,
                    encoded.body.len()
                );
                continue;
            }

            tracing::debug!("Request: {}", String::from_utf8_lossy(&encoded.body));
            match self.uploader.upload(encoded.body).await {
                Ok(response) if response.is_success() => {
                    summary.batches_uploaded += 1;
                    tracing::info!(
                        "Posted bulk {} with response code {}: {}",
                        batch_number,
                        response.status,
                        response.body
                    );
                }
                Ok(response) => {
                    summary.batches_rejected += 1;
                    tracing::warn!(
                        "Bulk {} rejected with response code {}: {}",
                        batch_number,
                        response.status,
                        response.body
                    );
                }
                Err(e) => {
                    summary.batches_failed += 1;
                    tracing::error!("Failed posting bulk {}: {}", batch_number, e);
                }
            }
        }

        self.monitor.log_final_stats();
        Ok(summary)
    }
}
