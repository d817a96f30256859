use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::StatusCode;

/// What the indexing endpoint answered. The body is kept opaque.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[async_trait]
pub trait BulkUploader: Send + Sync {
    /// Sends one encoded batch. Transport failures are returned as errors; any
    /// HTTP status, including non-2xx, is a response.
    async fn upload(&self, payload: Vec<u8>) -> Result<UploadResponse>;
}
