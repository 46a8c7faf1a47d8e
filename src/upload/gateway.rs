use std::{sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    config::env::{BoothConfig, UPLOAD_URL_VAR},
    foundation::error::{BoothError, BoothResult},
    strip::compose::{StripOptions, compose_strip},
};

/// Path appended to the configured base URL.
pub const UPLOAD_PATH: &str = "/api/upload";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON body of an upload request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UploadRequest {
    /// Encoded strip as a data URL.
    pub image: String,
    /// Target file name.
    pub filename: String,
    /// Configuration key selecting the destination account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Raw HTTP reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

/// Result of one upload attempt. Failures are values, never errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadOutcome {
    /// Whether the endpoint confirmed the upload.
    #[serde(default)]
    pub success: bool,
    /// Stored file identifier.
    #[serde(default)]
    pub file_id: Option<String>,
    /// Stored file name.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Link to view the stored file.
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Informational message from the endpoint.
    #[serde(default)]
    pub message: Option<String>,
    /// Human-readable failure reason.
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadOutcome {
    /// Failed outcome carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Network seam of the gateway.
#[async_trait::async_trait]
pub trait UploadTransport: Send + Sync {
    /// POST `request` as JSON to `url`.
    async fn post_json(&self, url: &str, request: &UploadRequest)
    -> BoothResult<TransportResponse>;
}

/// [`UploadTransport`] over a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with a request timeout.
    pub fn new() -> BoothResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl UploadTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        request: &UploadRequest,
    ) -> BoothResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| BoothError::upload(format!("failed to reach {url}: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BoothError::upload(format!("failed to read response: {e}")))?;
        Ok(TransportResponse { status, body })
    }
}

/// Thin client to the remote strip storage endpoint.
///
/// Never mutates usage counters; callers record success themselves.
#[derive(Clone)]
pub struct UploadGateway {
    base_url: Option<String>,
    transport: Arc<dyn UploadTransport>,
}

impl std::fmt::Debug for UploadGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UploadGateway {
    /// Gateway over an explicit transport. `base_url` of `None` disables uploads.
    pub fn new(base_url: Option<String>, transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            transport,
        }
    }

    /// Gateway for the configured endpoint over HTTP.
    pub fn from_config(config: &BoothConfig) -> BoothResult<Self> {
        Ok(Self::new(
            config.upload_url.clone(),
            Arc::new(ReqwestTransport::new()?),
        ))
    }

    /// Whether an endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Compose `photos` into a strip and upload it as `<base_name without extension>.jpg`.
    #[tracing::instrument(skip(self, photos, opts), fields(count = photos.len()))]
    pub async fn upload(
        &self,
        photos: &[String],
        base_name: &str,
        key: Option<&str>,
        opts: &StripOptions,
    ) -> UploadOutcome {
        if !self.is_configured() {
            return not_configured();
        }
        let image = match compose_strip(photos, opts).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "strip composition failed before upload");
                return UploadOutcome::failure(e.user_message());
            }
        };
        self.upload_image(image, &upload_file_name(base_name), key)
            .await
    }

    /// Upload an already encoded image.
    pub async fn upload_image(
        &self,
        image: String,
        filename: &str,
        key: Option<&str>,
    ) -> UploadOutcome {
        let Some(base) = self.base_url.as_deref() else {
            return not_configured();
        };
        let url = format!("{base}{UPLOAD_PATH}");
        let request = UploadRequest {
            image,
            filename: filename.to_string(),
            key: key.map(str::to_string),
        };
        match self.transport.post_json(&url, &request).await {
            Ok(resp) => interpret(resp),
            Err(e) => {
                tracing::warn!(error = %e, "upload transport failed");
                UploadOutcome::failure(e.user_message())
            }
        }
    }
}

fn not_configured() -> UploadOutcome {
    UploadOutcome::failure(format!("Upload not configured. Set {UPLOAD_URL_VAR}."))
}

fn interpret(resp: TransportResponse) -> UploadOutcome {
    let parsed: Option<UploadOutcome> = serde_json::from_str(&resp.body).ok();
    let ok_status = (200..300).contains(&resp.status);
    match parsed {
        Some(outcome) if ok_status && outcome.success => outcome,
        Some(outcome) => {
            let error = outcome
                .error
                .unwrap_or_else(|| format!("Upload failed (HTTP {})", resp.status));
            tracing::warn!(status = resp.status, error = error.as_str(), "upload rejected");
            UploadOutcome {
                success: false,
                error: Some(error),
                ..outcome
            }
        }
        None => {
            tracing::warn!(status = resp.status, "unreadable upload response");
            UploadOutcome::failure(format!("Upload failed (HTTP {})", resp.status))
        }
    }
}

/// `base_name` with any trailing extension replaced by `.jpg`.
pub fn upload_file_name(base_name: &str) -> String {
    let stem = match base_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => base_name,
    };
    format!("{stem}.jpg")
}

#[cfg(test)]
#[path = "../../tests/unit/upload/gateway.rs"]
mod tests;
