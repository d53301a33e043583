//! AnalysisClient - sends snips to the analysis backend.

use std::time::Duration;

use log::{debug, error, info};
use reqwest::Url;
use serde::Serialize;

use super::types::{AnalysisResponse, AnalysisResult};
use crate::app::config::BackendConfig;

/// Default analysis endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://plankton-app-p8a82.ondigitalocean.app/analyze";

/// Default timeout for the whole request (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a single analysis request.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server Error: {status}")]
    Server { status: u16 },

    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request body for the analyze endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    /// Bare base64 image payload.
    file: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Strip a `data:image/<fmt>;base64,` prefix if present.
pub fn strip_data_url_prefix(image: &str) -> &str {
    if let Some(rest) = image.strip_prefix("data:image/") {
        if let Some((format, payload)) = rest.split_once(";base64,") {
            if !format.is_empty() && format.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return payload;
            }
        }
    }
    image
}

/// Client for the remote analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl AnalysisClient {
    /// Create a client for the default endpoint.
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client for a custom endpoint with default timeouts.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, AnalysisError> {
        Self::with_timeouts(endpoint, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        endpoint: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| AnalysisError::InvalidEndpoint(endpoint.to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    /// Create a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, AnalysisError> {
        Self::with_timeouts(
            &config.endpoint,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send an image (bare base64 or a data URL) and return the normalized verdict.
    pub async fn try_analyze(&self, image: &str) -> Result<AnalysisResult, AnalysisError> {
        let payload = strip_data_url_prefix(image);
        debug!("Sending {} bytes of image data to {}", payload.len(), self.endpoint);

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&AnalyzeRequest {
                file: payload,
                kind: "image",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: AnalysisResponse = serde_json::from_slice(&body)?;
        let result = AnalysisResult::from_response(parsed);

        info!("Analysis complete: score {} ({})", result.score, result.label);
        Ok(result)
    }

    /// Like [`try_analyze`](Self::try_analyze), but any failure becomes the
    /// canned connection-failed result.
    pub async fn analyze(&self, image: &str) -> AnalysisResult {
        match self.try_analyze(image).await {
            Ok(result) => result,
            Err(e) => {
                error!("Backend Error: {}", e);
                AnalysisResult::connection_failed()
            }
        }
    }
}
