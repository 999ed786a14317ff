//! The unregistration engine.
//!
//! The inverse of registration: tear down the backend registration and the
//! channel token, clearing each piece of persisted state as the entity it
//! mirrors stops being trustworthy. Local channel state is cleared even when
//! the provider call fails, because the provider may have dropped the token
//! server-side while the confirmation was lost.

use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};
use pushbridge_common::services::{
    BoxedError, ChannelService, RegistrationService, RegistrationStateStore,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::RegistrationError;
use crate::phase::{EnginePhase, PhaseTracker, TerminalState};

/// Orchestrates one unregistration attempt. Like `RegistrationEngine`, the
/// snapshot is captured at construction and the engine is consumed by its one
/// operation.
pub struct UnregistrationEngine {
    channel: Arc<dyn ChannelService<Error = BoxedError>>,
    backend: Arc<dyn RegistrationService<Error = BoxedError>>,
    store: Arc<dyn RegistrationStateStore<Error = BoxedError>>,
    previous: RegistrationSnapshot,
    phase: PhaseTracker,
}

impl UnregistrationEngine {
    pub async fn new(
        channel: Arc<dyn ChannelService<Error = BoxedError>>,
        backend: Arc<dyn RegistrationService<Error = BoxedError>>,
        store: Arc<dyn RegistrationStateStore<Error = BoxedError>>,
    ) -> Result<Self, RegistrationError> {
        let previous = store.load().await.map_err(RegistrationError::Store)?;
        Ok(Self {
            channel,
            backend,
            store,
            previous,
            phase: PhaseTracker::new(),
        })
    }

    /// Tear down this device's registrations.
    ///
    /// Exactly one terminal outcome per call, reported through the `Result`.
    pub async fn unregister_device(
        mut self,
        parameters: RegistrationParameters,
    ) -> Result<(), RegistrationError> {
        let result = self.run(&parameters).await;
        let terminal = if result.is_ok() {
            TerminalState::Success
        } else {
            TerminalState::Failure
        };
        self.phase.advance(EnginePhase::Terminal(terminal));
        result
    }

    async fn run(&mut self, parameters: &RegistrationParameters) -> Result<(), RegistrationError> {
        self.phase.advance(EnginePhase::Validating);
        if parameters.server_url.trim().is_empty() {
            return Err(RegistrationError::InvalidParameters("server_url"));
        }

        // Stop inbound routing before any network round-trip.
        self.store
            .set_package_identity(None)
            .await
            .map_err(RegistrationError::Store)?;

        if !self.channel.is_provider_available() {
            return Err(RegistrationError::ProviderUnavailable(
                "the platform push-messaging service is not available on this device".to_string(),
            ));
        }

        self.phase.advance(EnginePhase::ChannelOp);
        info!("unregistering from channel provider");
        if let Err(err) = self.channel.unregister().await {
            warn!(error = %err, "channel unregister failed, clearing local channel state anyway");
        }

        // The token is no longer trustworthy either way.
        self.store
            .set_channel_token(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_sender_id(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_app_version(None)
            .await
            .map_err(RegistrationError::Store)?;

        let Some(backend_device_id) = self.previous.backend_device_id.clone() else {
            info!("no backend registration stored, unregistration complete");
            return Ok(());
        };

        self.phase.advance(EnginePhase::BackendOp);
        info!(%backend_device_id, "deleting backend registration");
        match self.backend.delete(&backend_device_id, parameters).await {
            Ok(()) => {
                self.clear_backend_registration().await?;
                info!("backend registration deleted");
                Ok(())
            }
            // Stored backend fields stay intact so a later unregister can
            // retry against the same id.
            Err(err) => Err(RegistrationError::Backend(err)),
        }
    }

    async fn clear_backend_registration(&mut self) -> Result<(), RegistrationError> {
        self.store
            .set_backend_device_id(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_platform_credentials(None, None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_device_alias(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_custom_user_id(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_server_url(None)
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_tags(None)
            .await
            .map_err(RegistrationError::Store)?;
        Ok(())
    }
}
