//! HTTP upload client posting encoded file payloads to a fixed endpoint.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::UploadConfig;
use crate::errors::UploadError;

/// JSON body sent to the upload endpoint, one per file. Constructed per
/// upload and discarded after.
#[derive(Debug, Serialize)]
pub struct UploadEnvelope<'a> {
    pub filename: &'a str,
    pub filedata: &'a str,
}

/// Upload capability used by the pipeline.
pub trait Uploader {
    /// Send one file payload. A non-2xx response or any transport failure
    /// (including timeout) is an error; there is no retry and no
    /// partial-success distinction.
    fn upload(&self, filename: &str, filedata: &str) -> Result<(), UploadError>;
}

/// Blocking HTTP client issuing a single timed POST per file.
pub struct UploadClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl UploadClient {
    /// Build a client with the configured endpoint and request timeout.
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: config.url.clone(),
            client,
        })
    }
}

impl Uploader for UploadClient {
    fn upload(&self, filename: &str, filedata: &str) -> Result<(), UploadError> {
        debug!("posting {filename} to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&UploadEnvelope { filename, filedata })
            .send()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status.as_u16()));
        }
        Ok(())
    }
}
