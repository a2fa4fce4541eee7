//! HTTP client for the remote refinement service.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, info};

use rcpt_core::refine::{parse_chat_response, ChatRequest, RefinedReceipt};
use rcpt_core::{RefinementConfig, RefinementError};

/// Sends transcripts to a chat-completions endpoint.
pub struct Refiner {
    client: reqwest::Client,
    config: RefinementConfig,
}

impl Refiner {
    pub fn new(config: &RefinementConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rcpt-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config: config.clone() })
    }

    /// Ask the service to extract fields from `transcript`.
    pub async fn refine(&self, transcript: &str) -> Result<RefinedReceipt, RefinementError> {
        let api_key = self.config.api_key().ok_or(RefinementError::NotConfigured)?;

        info!("Requesting refinement from {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&ChatRequest::new(&self.config, transcript))
            .send()
            .await
            .map_err(|e| RefinementError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RefinementError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(RefinementError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("Refinement response: {} bytes", body.len());
        parse_chat_response(&body)
    }
}

/// Run refinement when it was requested.
///
/// Returns `None` when refinement is off, so the local record is reported
/// as-is; an unconfigured key is reported as a refinement failure.
pub async fn maybe_refine(
    refiner: Option<&Refiner>,
    transcript: &str,
) -> Option<Result<RefinedReceipt, RefinementError>> {
    let refiner = refiner?;
    Some(refiner.refine(transcript).await)
}
