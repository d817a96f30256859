pub mod accumulator;
pub mod encoder;
pub mod loader;
pub mod source;
pub mod timestamp;
pub mod translator;
pub mod uploader;

pub use crate::domain::model::{Batch, NormalizedRecord, RawRow, RunSummary};
pub use crate::domain::ports::{BulkUploader, UploadResponse};
pub use crate::utils::error::Result;
