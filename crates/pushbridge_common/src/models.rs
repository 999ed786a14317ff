// This file contains the registration data model shared across the SDK.
// - RegistrationParameters: the caller's desired registration state
// - RegistrationSnapshot: the durably persisted last-known state

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The desired registration state supplied by the caller.
///
/// One immutable bundle per registration or unregistration attempt. The
/// required fields (platform identifier, platform secret, server URL) are
/// validated by the engines before any side effect takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationParameters {
    /// Tenant platform identifier issued by the application backend
    pub platform_identifier: String,

    /// Tenant platform secret paired with the identifier
    pub platform_secret: String,

    /// Base URL of the application backend the device registers against
    pub server_url: String,

    /// The calling application's package identity, persisted for receiver routing
    pub package_identity: String,

    /// Optional human-readable alias for this device
    pub device_alias: Option<String>,

    /// Optional custom user id bound to the registration
    pub custom_user_id: Option<String>,

    /// Optional channel-sender identifier the channel token is requested for
    pub sender_id: Option<String>,

    /// Optional tag set attached to the backend registration
    pub tags: Option<BTreeSet<String>>,
}

impl RegistrationParameters {
    /// Create a parameter bundle with the required fields set.
    pub fn new(
        platform_identifier: impl Into<String>,
        platform_secret: impl Into<String>,
        server_url: impl Into<String>,
        package_identity: impl Into<String>,
    ) -> Self {
        Self {
            platform_identifier: platform_identifier.into(),
            platform_secret: platform_secret.into(),
            server_url: server_url.into(),
            package_identity: package_identity.into(),
            device_alias: None,
            custom_user_id: None,
            sender_id: None,
            tags: None,
        }
    }

    pub fn with_device_alias(mut self, alias: impl Into<String>) -> Self {
        self.device_alias = Some(alias.into());
        self
    }

    pub fn with_custom_user_id(mut self, custom_user_id: impl Into<String>) -> Self {
        self.custom_user_id = Some(custom_user_id.into());
        self
    }

    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// The last-known registration state persisted for this device installation.
///
/// Every field is an explicit `Option`: absent means "this remote entity does
/// not exist (any more)", never the empty string. Fields are written
/// one-by-one as the corresponding remote operation succeeds, so a snapshot
/// loaded after a crash reflects exactly the operations that completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSnapshot {
    /// Opaque token issued by the channel provider
    pub channel_token: Option<String>,

    /// Device id issued by the application backend
    pub backend_device_id: Option<String>,

    /// Tenant platform identifier the backend registration was created with
    pub platform_identifier: Option<String>,

    /// Tenant platform secret the backend registration was created with
    pub platform_secret: Option<String>,

    /// Device alias carried by the backend registration
    pub device_alias: Option<String>,

    /// Custom user id carried by the backend registration
    pub custom_user_id: Option<String>,

    /// Backend base URL the registration lives on
    pub server_url: Option<String>,

    /// Channel-sender identifier the channel token was requested for
    pub sender_id: Option<String>,

    /// Package identity of the application that registered
    pub package_identity: Option<String>,

    /// Application version installed when the channel token was obtained
    pub app_version: Option<i64>,

    /// Tag set carried by the backend registration
    pub tags: Option<BTreeSet<String>>,
}

impl RegistrationSnapshot {
    /// True when nothing has ever been registered from this installation.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
