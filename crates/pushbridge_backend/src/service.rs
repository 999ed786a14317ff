//! Registration service implementation.
//!
//! Adapts `BackendClient` to the `RegistrationService` trait consumed by the
//! registration engines.

use pushbridge_common::models::RegistrationParameters;
use pushbridge_common::services::{BoxFuture, BoxedError, RegistrationService};
use std::sync::Arc;

use crate::client::BackendClient;

/// `RegistrationService` implementation backed by the HTTP registration API.
pub struct HttpRegistrationService {
    client: Arc<BackendClient>,
}

impl HttpRegistrationService {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

impl RegistrationService for HttpRegistrationService {
    type Error = BoxedError;

    fn create(
        &self,
        channel_token: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error> {
        let channel_token = channel_token.to_string();
        let parameters = parameters.clone();
        Box::pin(async move {
            self.client
                .create_registration(&channel_token, &parameters)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn update(
        &self,
        channel_token: &str,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error> {
        let channel_token = channel_token.to_string();
        let backend_device_id = backend_device_id.to_string();
        let parameters = parameters.clone();
        Box::pin(async move {
            self.client
                .update_registration(&channel_token, &backend_device_id, &parameters)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn delete(
        &self,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, (), Self::Error> {
        let backend_device_id = backend_device_id.to_string();
        let parameters = parameters.clone();
        Box::pin(async move {
            self.client
                .delete_registration(&backend_device_id, &parameters)
                .await
                .map_err(BoxedError::new)
        })
    }
}
