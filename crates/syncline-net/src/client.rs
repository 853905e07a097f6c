//! Multipart HTTP upload client
//!
//! One batch becomes one `POST`: a multipart body with one part per file,
//! every part under the `files` field, each carrying its filename. The
//! client performs exactly one attempt per call — retry lives in the
//! engine, which keeps a failed batch's paths pending.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use syncline_config::UploadConfig;
use syncline_types::{Batch, BatchTransport, Error, Result, UploadReceipt};
use tracing::{debug, warn};
use url::Url;

/// Form field shared by every file part; the server groups parts by it
const FILE_FIELD: &str = "files";

/// HTTP implementation of [`BatchTransport`]
pub struct HttpUploader {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpUploader {
    /// Start building an uploader
    pub fn builder() -> HttpUploaderBuilder {
        HttpUploaderBuilder::default()
    }

    /// Build an uploader from the upload configuration section
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        Self::builder()
            .url(&config.url)
            .timeout(config.timeout())
            .accept_invalid_certs(config.accept_invalid_certs)
            .build()
    }

    /// The upload target
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn read_part(&self, path: &Path) -> Result<Part> {
        let bytes = tokio::fs::read(path).await.map_err(|err| Error::Io {
            message: format!("failed to read '{}': {}", path.display(), err),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        Ok(Part::bytes(bytes).file_name(file_name))
    }
}

#[async_trait]
impl BatchTransport for HttpUploader {
    async fn send(&self, batch: &Batch) -> Result<UploadReceipt> {
        let mut form = Form::new();
        for path in &batch.paths {
            form = form.part(FILE_FIELD, self.read_part(path).await?);
        }

        debug!(
            batch = %batch.id,
            files = batch.len(),
            bytes = batch.total_bytes,
            url = %self.url,
            "sending upload batch"
        );

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    Error::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    Error::network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upload {
                status: status.as_u16(),
                paths: batch.paths.clone(),
            });
        }

        // The receipt is informational; a 2xx with an unparsable body is
        // still a successful upload.
        let receipt = match response.json::<UploadReceipt>().await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(batch = %batch.id, error = %err, "upload response body did not parse");
                UploadReceipt {
                    total: batch.len() as u64,
                    success: batch.len() as u64,
                    failed: 0,
                }
            }
        };

        debug!(
            batch = %batch.id,
            total = receipt.total,
            success = receipt.success,
            failed = receipt.failed,
            "upload acknowledged"
        );
        Ok(receipt)
    }
}

/// Builder for [`HttpUploader`]
#[derive(Debug)]
pub struct HttpUploaderBuilder {
    url: Option<String>,
    timeout: Duration,
    accept_invalid_certs: bool,
    user_agent: Option<String>,
}

impl Default for HttpUploaderBuilder {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(300),
            accept_invalid_certs: false,
            user_agent: None,
        }
    }
}

impl HttpUploaderBuilder {
    /// Set the upload target URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow insecure TLS (self-signed certificates)
    ///
    /// Off by default; enabling it is an operational trust decision.
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the uploader
    pub fn build(self) -> Result<HttpUploader> {
        let raw_url = self
            .url
            .ok_or_else(|| Error::config("upload URL is required"))?;
        let url = Url::parse(&raw_url)
            .map_err(|err| Error::config(format!("invalid upload URL '{}': {}", raw_url, err)))?;

        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| Error::network(err.to_string()))?;

        Ok(HttpUploader {
            client,
            url,
            timeout: self.timeout,
        })
    }
}
