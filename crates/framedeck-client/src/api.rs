//! The client's view of the demo API
//!
//! [`FrameApi`] is the seam the editor and cache depend on; [`HttpApi`] is
//! the production implementation over HTTP.

use crate::config::ClientConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use framedeck_model::{Demo, ErrorBody, Frame, FrameId, UpdateFrameHtml};
use serde::de::DeserializeOwned;

/// Operations the client needs from the server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameApi: Send + Sync {
    /// Fetch every demo with its frames
    async fn list_demos(&self) -> Result<Vec<Demo>, ClientError>;

    /// Persist new markup for a frame and return the stored row
    async fn update_frame_html(&self, id: FrameId, html: String) -> Result<Frame, ClientError>;
}

/// [`FrameApi`] over HTTP using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Create client for the configured API root
    ///
    /// # Errors
    /// - `ClientError::Network` if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl FrameApi for HttpApi {
    async fn list_demos(&self) -> Result<Vec<Demo>, ClientError> {
        let url = self.config.url("/demos");
        tracing::debug!(%url, "fetching demos");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    async fn update_frame_html(&self, id: FrameId, html: String) -> Result<Frame, ClientError> {
        let url = self.config.url(&format!("/frames/{id}"));
        tracing::debug!(%url, bytes = html.len(), "saving frame");
        let response = self
            .http
            .put(&url)
            .json(&UpdateFrameHtml { html })
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    tracing::warn!(status = status.as_u16(), %message, "request failed");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
