use base64::{engine::general_purpose, Engine as _};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::utils::error::{InstallError, Result};

/// Pinned digest of a runtime archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedDigest {
    /// Subresource-integrity form, `sha256-<base64>`
    Sri(String),
    /// Lowercase hex SHA-256
    Hex(String),
}

impl ExpectedDigest {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(b64) = value.strip_prefix("sha256-") {
            general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| InstallError::Config(format!("Invalid sha256 digest '{value}': {e}")))?;
            return Ok(Self::Sri(b64.to_string()));
        }
        if value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self::Hex(value.to_ascii_lowercase()));
        }
        Err(InstallError::Config(format!(
            "Unsupported digest '{value}' (expected sha256-<base64> or 64 hex digits)"
        )))
    }

    fn expected(&self) -> &str {
        match self {
            Self::Sri(v) | Self::Hex(v) => v,
        }
    }

    fn compute(&self, data: &[u8]) -> String {
        let hash = Sha256::digest(data);
        match self {
            Self::Sri(_) => general_purpose::STANDARD.encode(hash),
            Self::Hex(_) => format!("{hash:x}"),
        }
    }

    pub fn verify(&self, url: &str, data: &[u8]) -> Result<()> {
        let actual = self.compute(data);
        if actual != self.expected() {
            return Err(InstallError::Integrity {
                url: url.to_string(),
                expected: self.expected().to_string(),
                actual,
            });
        }
        Ok(())
    }
}

/// Downloaded archive bytes plus transfer statistics
#[derive(Debug, Clone)]
pub struct Download {
    pub data: Vec<u8>,
    pub duration: Duration,
}

impl Download {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// HTTP client for the runtime distribution server
#[derive(Debug, Clone)]
pub struct RuntimeDownloader {
    client: Client,
    user_agent: String,
}

impl RuntimeDownloader {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InstallError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            user_agent: format!("grinstall/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Fetch the archive at `url`. Anything other than a 200 response is an error.
    pub async fn fetch(&self, url: &str) -> Result<Download> {
        let start = Instant::now();
        tracing::info!(%url, "downloading runtime archive");

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| InstallError::Network(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "distribution server did not return the archive");
            return Err(InstallError::RuntimeNotFound {
                url: url.to_string(),
            });
        }

        let total = response.content_length();
        let mut data = Vec::with_capacity(usize::try_from(total.unwrap_or(0)).unwrap_or(0));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| InstallError::Network(format!("Download stream error: {e}")))?;
            data.extend_from_slice(&chunk);
        }

        let duration = start.elapsed();
        tracing::debug!(%url, bytes = data.len(), ?total, ?duration, "download finished");

        Ok(Download {
            data,
            duration,
        })
    }

    /// Fetch and, when a digest is pinned, verify the archive
    pub async fn fetch_verified(&self, url: &str, digest: Option<&ExpectedDigest>) -> Result<Download> {
        let download = self.fetch(url).await?;
        if let Some(digest) = digest {
            digest.verify(url, &download.data)?;
            tracing::info!(%url, "archive digest verified");
        }
        Ok(download)
    }
}
