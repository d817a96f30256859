pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::{ColumnIndices, FieldMapping};

pub use core::{
    accumulator::BatchAccumulator, encoder::encode, loader::TripLoader, source::CsvRowSource,
    timestamp::TimeFormat, translator::translate, uploader::HttpUploader,
};
pub use domain::model::{Batch, BatchStats, NormalizedRecord, Position, RawRow, RunSummary};
pub use utils::error::{EtlError, Result, TranslationError};
