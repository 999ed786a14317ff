//! Registration API client
//!
//! This module provides the HTTP client for the application backend's
//! registration API: create, update, and delete of the registration record
//! binding a channel token to the tenant identity. Authentication is HTTP
//! basic auth with the tenant platform identifier and secret.

use once_cell::sync::Lazy;
use pushbridge_common::models::RegistrationParameters;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{RegistrationRequest, RegistrationResponse};

/// Default timeout for registration API requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Initialize the reqwest client lazily and reuse it for all registration calls
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
});

/// Errors that can occur when talking to the registration API
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error during the HTTP request
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The backend rejected the call
    #[error("Registration API error: Status={status}, Message='{message}'")]
    ApiError { status: u16, message: String },
}

/// Client for the application backend's registration API.
///
/// The client is stateless: server URL and tenant credentials travel in the
/// parameter bundle of each call, so one client serves any tenant.
#[derive(Debug, Default)]
pub struct BackendClient;

impl BackendClient {
    pub fn new() -> Self {
        Self
    }

    fn registrations_url(parameters: &RegistrationParameters) -> String {
        format!(
            "{}/v1/registrations",
            parameters.server_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(
        channel_token: &'a str,
        parameters: &'a RegistrationParameters,
    ) -> RegistrationRequest<'a> {
        RegistrationRequest {
            channel_token,
            device_alias: parameters.device_alias.as_deref(),
            custom_user_id: parameters.custom_user_id.as_deref(),
            tags: parameters.tags.as_ref(),
            package_identity: &parameters.package_identity,
        }
    }

    async fn parse_device_id(
        response: reqwest::Response,
    ) -> Result<Option<String>, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: RegistrationResponse = response.json().await?;
        // An empty id is as useless as a missing one; normalize both to None
        // and let the engine decide what a success-without-id means.
        Ok(body.device_uuid.filter(|id| !id.is_empty()))
    }

    /// Create a new registration record. Resolves to the backend-issued
    /// device id, or `None` when the backend reported success without one.
    pub async fn create_registration(
        &self,
        channel_token: &str,
        parameters: &RegistrationParameters,
    ) -> Result<Option<String>, BackendError> {
        let url = Self::registrations_url(parameters);
        debug!(%url, "creating backend registration");

        let response = HTTP_CLIENT
            .post(&url)
            .basic_auth(
                &parameters.platform_identifier,
                Some(&parameters.platform_secret),
            )
            .json(&Self::request_body(channel_token, parameters))
            .send()
            .await?;

        Self::parse_device_id(response).await
    }

    /// Update the registration record `backend_device_id`.
    pub async fn update_registration(
        &self,
        channel_token: &str,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> Result<Option<String>, BackendError> {
        let url = format!(
            "{}/{}",
            Self::registrations_url(parameters),
            backend_device_id
        );
        debug!(%url, "updating backend registration");

        let response = HTTP_CLIENT
            .put(&url)
            .basic_auth(
                &parameters.platform_identifier,
                Some(&parameters.platform_secret),
            )
            .json(&Self::request_body(channel_token, parameters))
            .send()
            .await?;

        Self::parse_device_id(response).await
    }

    /// Delete the registration record `backend_device_id`.
    pub async fn delete_registration(
        &self,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> Result<(), BackendError> {
        let url = format!(
            "{}/{}",
            Self::registrations_url(parameters),
            backend_device_id
        );
        debug!(%url, "deleting backend registration");

        let response = HTTP_CLIENT
            .delete(&url)
            .basic_auth(
                &parameters.platform_identifier,
                Some(&parameters.platform_secret),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
