//! Channel-provider token client
//!
//! This module provides a client for the channel provider's device token
//! service (an FCM-style HTTP API). It can request a token for this
//! installation, optionally scoped to a sender id, and revoke the token
//! again. The main component is the `FcmChannelClient` struct, which handles
//! authentication and communication with the token endpoint.

use once_cell::sync::Lazy;
use pushbridge_config::ChannelConfig;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default timeout for token service requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default production endpoint of the token service
const DEFAULT_ENDPOINT: &str = "https://fcmtoken.googleapis.com";

// Initialize the reqwest client lazily and reuse it for all token calls
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
});

/// Errors that can occur when interacting with the channel provider
#[derive(Error, Debug)]
pub enum FcmError {
    /// Missing required configuration
    #[error("Missing channel configuration: {0}")]
    ConfigError(String),

    /// Error during the HTTP request to the token service
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the token service
    #[error("Channel provider API error: {0}")]
    ApiError(String),

    /// The provider reported success but returned no token
    #[error("Channel provider returned an empty token")]
    EmptyToken,
}

/// Request body for obtaining a device token
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    /// Sender the token should be scoped to, when the provider distinguishes senders
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_id: Option<&'a str>,

    /// Authorized scope of the token
    scope: &'a str,
}

/// Response from the token service
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// The opaque routing token issued for this installation
    token: String,
}

/// Client for the channel provider's device token service.
///
/// The api key is an installation-scoped credential, so revocation needs no
/// explicit token argument; the provider derives the installation from the
/// credential.
pub struct FcmChannelClient {
    config: ChannelConfig,
}

impl FcmChannelClient {
    /// Creates a new channel client with the given configuration
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    /// Whether the provider is reachable in principle: project id and api key
    /// are configured. Checked before any registration attempt.
    pub fn is_configured(&self) -> bool {
        self.config.project_id.as_deref().is_some_and(|p| !p.is_empty())
            && self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn tokens_url(&self) -> Result<String, FcmError> {
        let project_id = self.config.project_id.as_deref().ok_or_else(|| {
            FcmError::ConfigError("Missing project_id in ChannelConfig".to_string())
        })?;
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/');
        Ok(format!("{}/v1/projects/{}/tokens", endpoint, project_id))
    }

    fn api_key(&self) -> Result<&str, FcmError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| FcmError::ConfigError("Missing api_key in ChannelConfig".to_string()))
    }

    /// Requests a device token from the channel provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete, the HTTP request
    /// fails, the provider rejects the request, or the provider responds with
    /// an empty token.
    pub async fn request_token(&self, sender_id: Option<&str>) -> Result<String, FcmError> {
        let url = self.tokens_url()?;
        let body = TokenRequest {
            sender_id,
            scope: "push",
        };

        let response = HTTP_CLIENT
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key()?))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(FcmError::ApiError(error_text));
        }

        let token_response: TokenResponse = response.json().await?;
        if token_response.token.is_empty() {
            return Err(FcmError::EmptyToken);
        }
        Ok(token_response.token)
    }

    /// Revokes the device token held by this installation.
    pub async fn revoke_token(&self) -> Result<(), FcmError> {
        let url = self.tokens_url()?;

        let response = HTTP_CLIENT
            .delete(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key()?))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(FcmError::ApiError(error_text));
        }
        Ok(())
    }
}
