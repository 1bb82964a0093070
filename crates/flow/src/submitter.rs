//! Delivery of the assembled campaign request to the campaign API.

use std::time::Duration;

use async_trait::async_trait;
use audience_core::config::SubmissionConfig;
use audience_core::types::CampaignData;
use audience_core::{AudienceError, AudienceResult};
use tracing::{debug, info, warn};
use url::Url;

/// Sends a campaign request and returns the API's JSON response.
#[async_trait]
pub trait PayloadSubmitter: Send + Sync {
    async fn submit(&self, data: &CampaignData) -> AudienceResult<serde_json::Value>;
}

/// Posts the payload as JSON over HTTP. No retries: a failure is reported to
/// the caller as is.
pub struct HttpPayloadSubmitter {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpPayloadSubmitter {
    pub fn new(endpoint: Url, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }

    pub fn from_config(config: &SubmissionConfig) -> AudienceResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| AudienceError::Config(format!("invalid endpoint {}: {e}", config.endpoint)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AudienceError::Transport(e.to_string()))?;
        Ok(Self::new(endpoint, http))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PayloadSubmitter for HttpPayloadSubmitter {
    async fn submit(&self, data: &CampaignData) -> AudienceResult<serde_json::Value> {
        debug!(url = %self.endpoint, "Posting campaign request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(data)
            .send()
            .await
            .map_err(|e| AudienceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Campaign API rejected the request");
            return Err(AudienceError::Submission {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AudienceError::Transport(e.to_string()))?;
        let value = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body)?
        };
        info!(status = status.as_u16(), "Campaign request accepted");
        Ok(value)
    }
}
