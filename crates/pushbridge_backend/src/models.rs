// --- File: crates/pushbridge_backend/src/models.rs ---
//
// Wire structures for the registration API. The request is borrowed from the
// caller's parameter bundle; the response is owned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Request body for creating or updating a backend registration.
#[derive(Serialize, Debug)]
pub struct RegistrationRequest<'a> {
    /// The channel token messages will be routed to
    pub channel_token: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_alias: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_user_id: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a BTreeSet<String>>,

    /// Package identity of the registering application
    pub package_identity: &'a str,
}

/// Response from the registration API.
///
/// A well-formed success carries the backend-issued device id; servers have
/// been observed to answer 200 without one, which callers must treat as
/// malformed.
#[derive(Deserialize, Debug)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub device_uuid: Option<String>,
}
