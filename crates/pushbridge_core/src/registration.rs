//! The registration reconciliation engine.
//!
//! Given the previously persisted registration snapshot and a freshly
//! supplied parameter bundle, decide the minimal sequence of remote
//! operations that brings the channel provider and the application backend
//! into a consistent state, and execute it. Any step may have succeeded or
//! failed on an earlier run; every successful remote step is persisted before
//! the next one starts, so repeated invocations converge instead of
//! duplicating or losing registrations.

use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};
use pushbridge_common::services::{
    BoxedError, ChannelService, RegistrationService, RegistrationStateStore, VersionProvider,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::comparator::{classify, ChangeClassification};
use crate::error::RegistrationError;
use crate::phase::{EnginePhase, PhaseTracker, TerminalState};

/// Which backend operation an attempt performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    Create,
    Update,
}

/// What a successful registration attempt converged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// The channel token the device is reachable under
    pub channel_token: String,
    /// The backend device id, when a backend registration exists
    pub backend_device_id: Option<String>,
    /// Whether this attempt performed a channel registration
    pub channel_registered: bool,
    /// Which backend operation this attempt performed, if any
    pub backend_operation: Option<BackendOperation>,
}

/// How the backend side of an attempt should proceed.
enum BackendPlan {
    Create,
    Update(String),
    Skip,
}

/// Orchestrates one registration attempt.
///
/// The previous snapshot is captured once at construction and every decision
/// references that captured view, even though persistence happens
/// incrementally during the attempt. `register_device` consumes the engine:
/// one instance, one attempt. Callers construct a fresh engine per attempt,
/// which is what makes concurrent attempts impossible to express.
pub struct RegistrationEngine {
    channel: Arc<dyn ChannelService<Error = BoxedError>>,
    backend: Arc<dyn RegistrationService<Error = BoxedError>>,
    store: Arc<dyn RegistrationStateStore<Error = BoxedError>>,
    versions: Arc<dyn VersionProvider>,
    previous: RegistrationSnapshot,
    phase: PhaseTracker,
}

impl RegistrationEngine {
    /// Create an engine, capturing the current snapshot as the "previous"
    /// side of every comparison this attempt will make.
    pub async fn new(
        channel: Arc<dyn ChannelService<Error = BoxedError>>,
        backend: Arc<dyn RegistrationService<Error = BoxedError>>,
        store: Arc<dyn RegistrationStateStore<Error = BoxedError>>,
        versions: Arc<dyn VersionProvider>,
    ) -> Result<Self, RegistrationError> {
        let previous = store.load().await.map_err(RegistrationError::Store)?;
        Ok(Self {
            channel,
            backend,
            store,
            versions,
            previous,
            phase: PhaseTracker::new(),
        })
    }

    /// The snapshot captured at construction.
    pub fn previous_snapshot(&self) -> &RegistrationSnapshot {
        &self.previous
    }

    /// Reconcile the device's registrations with `parameters`.
    ///
    /// Exactly one terminal outcome per call: the returned `Result` is the
    /// attempt's single success-or-failure report.
    pub async fn register_device(
        mut self,
        parameters: RegistrationParameters,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let result = self.run(&parameters).await;
        let terminal = if result.is_ok() {
            TerminalState::Success
        } else {
            TerminalState::Failure
        };
        self.phase.advance(EnginePhase::Terminal(terminal));
        result
    }

    async fn run(
        &mut self,
        parameters: &RegistrationParameters,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        self.phase.advance(EnginePhase::Validating);
        validate_registration_parameters(parameters)?;

        // Receiver routing needs the package identity even if everything
        // after this fails.
        self.store
            .set_package_identity(Some(parameters.package_identity.clone()))
            .await
            .map_err(RegistrationError::Store)?;

        let current_app_version = self.versions.current_app_version();
        let changes = classify(&self.previous, parameters, current_app_version);
        debug!(?changes, "classified registration parameters");

        // A token obtained for the old sender is useless to the new one.
        // Unregistering it is best-effort cleanup: a failure here must not
        // block the re-registration.
        if changes.sender_id_changed {
            self.phase.advance(EnginePhase::ChannelOp);
            info!(
                previous = self.previous.sender_id.as_deref(),
                requested = parameters.sender_id.as_deref(),
                "channel sender changed, unregistering stale channel token"
            );
            if let Err(err) = self.channel.unregister().await {
                warn!(error = %err, "channel unregister failed, proceeding with re-registration");
            }
        }

        // A stored token is only reusable when nothing invalidated it; a
        // missing token always classifies as requiring registration.
        let reusable_token = if changes.channel_registration_required() {
            None
        } else {
            self.previous.channel_token.clone()
        };

        let (channel_token, token_changed, channel_registered) = match reusable_token {
            Some(token) => (token, false, false),
            None => {
                let token = self
                    .register_channel(parameters, current_app_version)
                    .await?;
                let token_changed = self.previous.channel_token.as_deref() != Some(token.as_str());
                (token, token_changed, true)
            }
        };

        self.reconcile_backend(
            parameters,
            &changes,
            channel_token,
            token_changed,
            channel_registered,
        )
        .await
    }

    async fn register_channel(
        &mut self,
        parameters: &RegistrationParameters,
        current_app_version: i64,
    ) -> Result<String, RegistrationError> {
        if !self.channel.is_provider_available() {
            return Err(RegistrationError::ProviderUnavailable(
                "the platform push-messaging service is not available on this device".to_string(),
            ));
        }

        self.phase.advance(EnginePhase::ChannelOp);
        info!(sender_id = parameters.sender_id.as_deref(), "registering with channel provider");
        let token = self
            .channel
            .register(parameters.sender_id.as_deref())
            .await
            .map_err(RegistrationError::Channel)?;

        // Durability before anything else happens: a crash after this point
        // must find the token on disk so the next attempt skips the channel.
        self.store
            .set_channel_token(Some(token.clone()))
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_sender_id(parameters.sender_id.clone())
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_app_version(Some(current_app_version))
            .await
            .map_err(RegistrationError::Store)?;

        info!("channel registration persisted");
        Ok(token)
    }

    async fn reconcile_backend(
        &mut self,
        parameters: &RegistrationParameters,
        changes: &ChangeClassification,
        channel_token: String,
        token_changed: bool,
        channel_registered: bool,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        // A different server is a different backend identity, never an
        // update target, regardless of any stored backend id.
        let plan = if changes.server_url_changed {
            BackendPlan::Create
        } else {
            match &self.previous.backend_device_id {
                Some(id) if token_changed || changes.identity_changed() => {
                    BackendPlan::Update(id.clone())
                }
                _ if changes.backend_create_required() => BackendPlan::Create,
                _ => BackendPlan::Skip,
            }
        };

        let (operation, result) = match plan {
            BackendPlan::Skip => {
                info!("registration already consistent, no backend operation required");
                return Ok(RegistrationOutcome {
                    channel_token,
                    backend_device_id: self.previous.backend_device_id.clone(),
                    channel_registered,
                    backend_operation: None,
                });
            }
            BackendPlan::Create => {
                self.phase.advance(EnginePhase::BackendOp);
                info!("creating backend registration");
                (
                    BackendOperation::Create,
                    self.backend.create(&channel_token, parameters).await,
                )
            }
            BackendPlan::Update(backend_device_id) => {
                self.phase.advance(EnginePhase::BackendOp);
                info!(%backend_device_id, "updating backend registration");
                (
                    BackendOperation::Update,
                    self.backend
                        .update(&channel_token, &backend_device_id, parameters)
                        .await,
                )
            }
        };

        match result {
            Ok(Some(backend_device_id)) => {
                self.persist_backend_registration(&backend_device_id, parameters)
                    .await?;
                info!(%backend_device_id, "backend registration persisted");
                Ok(RegistrationOutcome {
                    channel_token,
                    backend_device_id: Some(backend_device_id),
                    channel_registered,
                    backend_operation: Some(operation),
                })
            }
            Ok(None) => {
                // The server said yes but gave us nothing to address the
                // registration by. Reset so the next attempt starts clean.
                warn!("backend reported success without a device id, clearing backend state");
                self.clear_backend_registration().await?;
                Err(RegistrationError::MalformedResponse)
            }
            Err(err) => {
                // Stored backend fields stay untouched so a later attempt can
                // still update the last known-good registration.
                Err(RegistrationError::Backend(err))
            }
        }
    }

    async fn persist_backend_registration(
        &mut self,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> Result<(), RegistrationError> {
        self.store
            .set_backend_device_id(Some(backend_device_id.to_string()))
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_platform_credentials(
                Some(parameters.platform_identifier.clone()),
                Some(parameters.platform_secret.clone()),
            )
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_device_alias(parameters.device_alias.clone())
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_custom_user_id(parameters.custom_user_id.clone())
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_server_url(Some(parameters.server_url.clone()))
            .await
            .map_err(RegistrationError::Store)?;
        self.store
            .set_tags(parameters.tags.clone())
            .await
            .map_err(RegistrationError::Store)?;
        Ok(())
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

fn validate_registration_parameters(
    parameters: &RegistrationParameters,
) -> Result<(), RegistrationError> {
    if parameters.platform_identifier.trim().is_empty() {
        return Err(RegistrationError::InvalidParameters("platform_identifier"));
    }
    if parameters.platform_secret.trim().is_empty() {
        return Err(RegistrationError::InvalidParameters("platform_secret"));
    }
    if parameters.server_url.trim().is_empty() {
        return Err(RegistrationError::InvalidParameters("server_url"));
    }
    if parameters.package_identity.trim().is_empty() {
        return Err(RegistrationError::InvalidParameters("package_identity"));
    }
    Ok(())
}
