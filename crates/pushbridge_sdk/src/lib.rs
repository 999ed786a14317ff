//! Public facade of the Pushbridge SDK
//!
//! `PushBridge` wires configuration to the concrete collaborator services and
//! exposes the two operations hosts care about: `register_device` and
//! `unregister_device`. A fresh engine is constructed per attempt -- the
//! engines capture the persisted snapshot at construction and are consumed by
//! their one operation, so sharing one across attempts is impossible by
//! design.
//!
//! # Example
//!
//! ```rust,no_run
//! use pushbridge_sdk::PushBridge;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bridge = PushBridge::from_env().await?;
//! let outcome = bridge.register_device().await?;
//! println!("registered as {:?}", outcome.backend_device_id);
//! # Ok(())
//! # }
//! ```

pub mod service_factory;

use pushbridge_common::models::RegistrationParameters;
use pushbridge_common::services::ServiceFactory;
use pushbridge_config::{load_config, AppConfig, ConfigError};
use pushbridge_core::{
    RegistrationEngine, RegistrationError, RegistrationOutcome, UnregistrationEngine,
};
use std::sync::Arc;
use thiserror::Error;

pub use service_factory::{ConfigVersionProvider, PushBridgeServiceFactory};

/// Errors surfaced by the SDK facade.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A collaborator or config section the operation needs is not configured
    #[error("Missing configuration: {0}")]
    NotConfigured(&'static str),

    /// The underlying engine reported a failure
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// The Pushbridge SDK entry point.
pub struct PushBridge {
    config: Arc<AppConfig>,
    factory: Arc<PushBridgeServiceFactory>,
}

impl PushBridge {
    /// Build the SDK from layered file/environment configuration.
    pub async fn from_env() -> Result<Self, SdkError> {
        let config = Arc::new(load_config()?);
        Ok(Self::new_with_factory(config.clone(), PushBridgeServiceFactory::new(config).await))
    }

    /// Build the SDK from an already-loaded configuration.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        Self::new_with_factory(config.clone(), PushBridgeServiceFactory::new(config).await)
    }

    fn new_with_factory(config: Arc<AppConfig>, factory: PushBridgeServiceFactory) -> Self {
        Self {
            config,
            factory: Arc::new(factory),
        }
    }

    /// The parameter bundle derived from the `push` configuration section.
    pub fn default_parameters(&self) -> Result<RegistrationParameters, SdkError> {
        let push = self
            .config
            .push
            .as_ref()
            .ok_or(SdkError::NotConfigured("push"))?;
        let package_identity = push
            .package_identity
            .clone()
            .ok_or(SdkError::NotConfigured("push.package_identity"))?;

        let mut parameters = RegistrationParameters::new(
            push.platform_identifier.clone(),
            push.platform_secret.clone(),
            push.server_url.clone(),
            package_identity,
        );
        parameters.device_alias = push.device_alias.clone();
        parameters.sender_id = push.sender_id.clone();
        Ok(parameters)
    }

    /// Reconcile this device's registrations using the configured parameters.
    pub async fn register_device(&self) -> Result<RegistrationOutcome, SdkError> {
        let parameters = self.default_parameters()?;
        self.register_device_with(parameters).await
    }

    /// Reconcile this device's registrations using an explicit parameter
    /// bundle. A fresh engine is constructed for this attempt.
    pub async fn register_device_with(
        &self,
        parameters: RegistrationParameters,
    ) -> Result<RegistrationOutcome, SdkError> {
        let engine = RegistrationEngine::new(
            self.factory
                .channel_service()
                .ok_or(SdkError::NotConfigured("channel"))?,
            self.factory
                .registration_service()
                .ok_or(SdkError::NotConfigured("backend"))?,
            self.factory
                .state_store()
                .ok_or(SdkError::NotConfigured("state store"))?,
            self.factory
                .version_provider()
                .ok_or(SdkError::NotConfigured("version provider"))?,
        )
        .await?;
        Ok(engine.register_device(parameters).await?)
    }

    /// Tear down this device's registrations using the configured parameters.
    pub async fn unregister_device(&self) -> Result<(), SdkError> {
        let parameters = self.default_parameters()?;
        self.unregister_device_with(parameters).await
    }

    /// Tear down this device's registrations using an explicit parameter
    /// bundle. A fresh engine is constructed for this attempt.
    pub async fn unregister_device_with(
        &self,
        parameters: RegistrationParameters,
    ) -> Result<(), SdkError> {
        let engine = UnregistrationEngine::new(
            self.factory
                .channel_service()
                .ok_or(SdkError::NotConfigured("channel"))?,
            self.factory
                .registration_service()
                .ok_or(SdkError::NotConfigured("backend"))?,
            self.factory
                .state_store()
                .ok_or(SdkError::NotConfigured("state store"))?,
        )
        .await?;
        Ok(engine.unregister_device(parameters).await?)
    }
}
