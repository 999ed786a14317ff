//! Parameter comparison.
//!
//! `classify` is a pure function of the previous snapshot, the desired
//! parameters, and the installed app version. It has no side effects and is
//! recomputed per attempt, never cached across store mutations. The derived
//! predicates encode the engine's decision tree; the engines own the order in
//! which they are consulted.

use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};

/// Boolean facts about what changed between the stored state and the caller's
/// desired state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeClassification {
    /// No channel token is stored
    pub channel_token_missing: bool,
    /// No channel-sender id is stored
    pub sender_id_missing: bool,
    /// A sender id is stored and the requested one differs
    pub sender_id_changed: bool,
    /// The installed app version differs from the stored one
    pub app_version_changed: bool,
    /// No backend device id is stored
    pub backend_id_missing: bool,
    /// No tenant platform identifier is stored
    pub platform_identifier_missing: bool,
    /// Stored tenant credentials differ from the requested ones
    pub credentials_changed: bool,
    /// Stored device alias differs from the requested one
    pub alias_changed: bool,
    /// Stored custom user id differs from the requested one
    pub custom_user_id_changed: bool,
    /// Stored backend server URL differs from the requested one
    pub server_url_changed: bool,
    /// Stored tag set differs from the requested one
    pub tags_changed: bool,
}

impl ChangeClassification {
    /// The channel token must be (re)obtained: there is none, its sender
    /// binding is unknown or stale, or the app version moved. The triggers
    /// are independent; none outranks another.
    pub fn channel_registration_required(&self) -> bool {
        self.channel_token_missing
            || self.sender_id_missing
            || self.sender_id_changed
            || self.app_version_changed
    }

    /// Any tenant/identity parameter of the backend registration changed.
    pub fn identity_changed(&self) -> bool {
        self.credentials_changed
            || self.alias_changed
            || self.custom_user_id_changed
            || self.server_url_changed
            || self.tags_changed
    }

    /// An existing backend registration must be updated in place.
    pub fn backend_update_required(&self, channel_token_changed: bool) -> bool {
        !self.backend_id_missing && (channel_token_changed || self.identity_changed())
    }

    /// A backend registration must be created from scratch.
    pub fn backend_create_required(&self) -> bool {
        self.channel_token_missing || self.platform_identifier_missing || self.identity_changed()
    }
}

/// Compare the desired parameters against the stored snapshot.
pub fn classify(
    previous: &RegistrationSnapshot,
    desired: &RegistrationParameters,
    current_app_version: i64,
) -> ChangeClassification {
    let sender_id_changed =
        previous.sender_id.is_some() && previous.sender_id.as_deref() != desired.sender_id.as_deref();

    ChangeClassification {
        channel_token_missing: previous.channel_token.is_none(),
        sender_id_missing: previous.sender_id.is_none(),
        sender_id_changed,
        app_version_changed: previous.app_version != Some(current_app_version),
        backend_id_missing: previous.backend_device_id.is_none(),
        platform_identifier_missing: previous.platform_identifier.is_none(),
        credentials_changed: previous.platform_identifier.as_deref()
            != Some(desired.platform_identifier.as_str())
            || previous.platform_secret.as_deref() != Some(desired.platform_secret.as_str()),
        alias_changed: previous.device_alias.as_deref() != desired.device_alias.as_deref(),
        custom_user_id_changed: previous.custom_user_id.as_deref()
            != desired.custom_user_id.as_deref(),
        server_url_changed: previous.server_url.as_deref() != Some(desired.server_url.as_str()),
        tags_changed: previous.tags != desired.tags,
    }
}
