use crate::domain::ports::{BulkUploader, UploadResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// PUTs each payload to the bulk endpoint with the client's default headers
/// and timeouts.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BulkUploader for HttpUploader {
    async fn upload(&self, payload: Vec<u8>) -> Result<UploadResponse> {
        tracing::debug!(
            "Sending {} bytes to: {}",
            payload.len(),
            self.endpoint
        );
        let response = self.client.put(&self.endpoint).body(payload).send().await?;

        let status = response.status();
        tracing::debug!("Bulk response status: {}", status);

        let body = response.text().await?;
        Ok(UploadResponse { status, body })
    }
}
