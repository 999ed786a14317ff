//! Channel service implementation.
//!
//! This module adapts `FcmChannelClient` to the `ChannelService` trait
//! consumed by the registration engines.

use pushbridge_common::services::{BoxFuture, BoxedError, ChannelService};
use std::sync::Arc;
use tracing::debug;

use crate::client::FcmChannelClient;

/// `ChannelService` implementation backed by the FCM-style token client.
pub struct FcmChannelService {
    client: Arc<FcmChannelClient>,
}

impl FcmChannelService {
    /// Create a new channel service around an existing client.
    pub fn new(client: Arc<FcmChannelClient>) -> Self {
        Self { client }
    }
}

impl ChannelService for FcmChannelService {
    type Error = BoxedError;

    fn register(&self, sender_id: Option<&str>) -> BoxFuture<'_, String, Self::Error> {
        let sender_id = sender_id.map(str::to_string);
        Box::pin(async move {
            debug!(sender_id = sender_id.as_deref(), "requesting channel token");
            self.client
                .request_token(sender_id.as_deref())
                .await
                .map_err(BoxedError::new)
        })
    }

    fn unregister(&self) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            debug!("revoking channel token");
            self.client.revoke_token().await.map_err(BoxedError::new)
        })
    }

    fn is_provider_available(&self) -> bool {
        self.client.is_configured()
    }
}
