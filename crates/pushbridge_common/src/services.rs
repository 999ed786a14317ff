//! Service abstractions for the registration collaborators.
//!
//! This module defines the trait seams between the reconciliation engines and
//! the external systems they drive: the channel provider, the application
//! backend, the durable state store, and the host application. The traits
//! allow dependency injection and easier testing by decoupling the engine
//! logic from concrete transports.

use std::collections::BTreeSet;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{RegistrationParameters, RegistrationSnapshot};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl BoxedError {
    /// Box an arbitrary error into the trait-object seam type.
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for channel-provider operations.
///
/// The channel provider is the platform push-messaging service that issues
/// the opaque per-device token messages are routed to. Registration returns
/// that token; unregistration invalidates it.
pub trait ChannelService: Send + Sync {
    /// Error type returned by channel operations.
    type Error: StdError + Send + Sync + 'static;

    /// Obtain a channel token for this installation, scoped to `sender_id`
    /// when the provider distinguishes senders.
    fn register(&self, sender_id: Option<&str>) -> BoxFuture<'_, String, Self::Error>;

    /// Invalidate the channel token held by this installation.
    fn unregister(&self) -> BoxFuture<'_, (), Self::Error>;

    /// Whether the underlying platform service can be reached at all.
    ///
    /// Checked before a channel registration is attempted; a `false` here is
    /// reported to the caller without any network round-trip.
    fn is_provider_available(&self) -> bool;
}

/// A trait for application-backend registration operations.
///
/// The backend binds a channel token to the tenant identity and device
/// metadata, keyed by a backend-issued device id.
///
/// `create` and `update` resolve to the backend-issued device id. A success
/// response that carries no id resolves to `Ok(None)`; deciding what that
/// means (a malformed success requiring a clean slate) is engine policy, not
/// transport policy.
pub trait RegistrationService: Send + Sync {
    /// Error type returned by backend operations.
    type Error: StdError + Send + Sync + 'static;

    /// Create a new backend registration for `channel_token`.
    fn create(
        &self,
        channel_token: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error>;

    /// Update the existing registration `backend_device_id` with a new token
    /// and/or changed device metadata.
    fn update(
        &self,
        channel_token: &str,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error>;

    /// Delete the registration `backend_device_id`.
    fn delete(
        &self,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// A trait for the durable registration state store.
///
/// Each setter is independently durable: when its future resolves `Ok`, the
/// field is on disk. The engines call a setter immediately after each
/// successful remote step so that a crash between steps leaves the snapshot
/// consistent with exactly the operations that completed. Passing `None`
/// clears the field.
pub trait RegistrationStateStore: Send + Sync {
    /// Error type returned by store operations.
    type Error: StdError + Send + Sync + 'static;

    /// Load the full snapshot as last persisted.
    fn load(&self) -> BoxFuture<'_, RegistrationSnapshot, Self::Error>;

    fn set_channel_token(&self, token: Option<String>) -> BoxFuture<'_, (), Self::Error>;

    fn set_backend_device_id(&self, device_id: Option<String>) -> BoxFuture<'_, (), Self::Error>;

    fn set_app_version(&self, version: Option<i64>) -> BoxFuture<'_, (), Self::Error>;

    /// Identifier and secret always change together, so they persist together.
    fn set_platform_credentials(
        &self,
        identifier: Option<String>,
        secret: Option<String>,
    ) -> BoxFuture<'_, (), Self::Error>;

    fn set_device_alias(&self, alias: Option<String>) -> BoxFuture<'_, (), Self::Error>;

    fn set_custom_user_id(&self, custom_user_id: Option<String>)
        -> BoxFuture<'_, (), Self::Error>;

    fn set_server_url(&self, server_url: Option<String>) -> BoxFuture<'_, (), Self::Error>;

    fn set_sender_id(&self, sender_id: Option<String>) -> BoxFuture<'_, (), Self::Error>;

    fn set_tags(&self, tags: Option<BTreeSet<String>>) -> BoxFuture<'_, (), Self::Error>;

    fn set_package_identity(&self, package: Option<String>) -> BoxFuture<'_, (), Self::Error>;
}

/// Access to the host application's installed version.
///
/// A changed app version invalidates the channel token on some platforms, so
/// the engines compare this against the persisted value.
pub trait VersionProvider: Send + Sync {
    fn current_app_version(&self) -> i64;
}

/// A factory for creating service instances.
///
/// Implemented by the composition root; each accessor returns `None` when the
/// corresponding collaborator is not configured.
pub trait ServiceFactory: Send + Sync {
    /// Get the channel-provider service instance.
    fn channel_service(&self) -> Option<Arc<dyn ChannelService<Error = BoxedError>>>;

    /// Get the application-backend registration service instance.
    fn registration_service(&self) -> Option<Arc<dyn RegistrationService<Error = BoxedError>>>;

    /// Get the durable state store instance.
    fn state_store(&self) -> Option<Arc<dyn RegistrationStateStore<Error = BoxedError>>>;

    /// Get the app-version accessor.
    fn version_provider(&self) -> Option<Arc<dyn VersionProvider>>;
}
