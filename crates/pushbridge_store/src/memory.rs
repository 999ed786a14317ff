//! In-memory implementation of the registration state store
//!
//! Used when no database is configured and by engine tests. State lives for
//! the lifetime of the process; durability guarantees degrade to "survives
//! until the process exits", which is acceptable for hosts that re-register
//! on every launch.

use pushbridge_common::models::RegistrationSnapshot;
use pushbridge_common::services::{BoxFuture, BoxedError, RegistrationStateStore};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// In-memory registration state store.
#[derive(Debug, Default)]
pub struct MemoryRegistrationStateStore {
    inner: Mutex<RegistrationSnapshot>,
}

impl MemoryRegistrationStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a snapshot, e.g. for tests that
    /// start from a previously registered device.
    pub fn with_snapshot(snapshot: RegistrationSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Current snapshot contents, for assertions.
    pub fn snapshot(&self) -> RegistrationSnapshot {
        self.inner.lock().expect("state store mutex poisoned").clone()
    }

    fn mutate(&self, f: impl FnOnce(&mut RegistrationSnapshot)) {
        let mut guard = self.inner.lock().expect("state store mutex poisoned");
        f(&mut guard);
    }
}

impl RegistrationStateStore for MemoryRegistrationStateStore {
    type Error = BoxedError;

    fn load(&self) -> BoxFuture<'_, RegistrationSnapshot, Self::Error> {
        let snapshot = self.snapshot();
        Box::pin(async move { Ok(snapshot) })
    }

    fn set_channel_token(&self, token: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.channel_token = token);
        Box::pin(async move { Ok(()) })
    }

    fn set_backend_device_id(&self, device_id: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.backend_device_id = device_id);
        Box::pin(async move { Ok(()) })
    }

    fn set_app_version(&self, version: Option<i64>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.app_version = version);
        Box::pin(async move { Ok(()) })
    }

    fn set_platform_credentials(
        &self,
        identifier: Option<String>,
        secret: Option<String>,
    ) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| {
            s.platform_identifier = identifier;
            s.platform_secret = secret;
        });
        Box::pin(async move { Ok(()) })
    }

    fn set_device_alias(&self, alias: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.device_alias = alias);
        Box::pin(async move { Ok(()) })
    }

    fn set_custom_user_id(
        &self,
        custom_user_id: Option<String>,
    ) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.custom_user_id = custom_user_id);
        Box::pin(async move { Ok(()) })
    }

    fn set_server_url(&self, server_url: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.server_url = server_url);
        Box::pin(async move { Ok(()) })
    }

    fn set_sender_id(&self, sender_id: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.sender_id = sender_id);
        Box::pin(async move { Ok(()) })
    }

    fn set_tags(&self, tags: Option<BTreeSet<String>>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.tags = tags);
        Box::pin(async move { Ok(()) })
    }

    fn set_package_identity(&self, package: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        self.mutate(|s| s.package_identity = package);
        Box::pin(async move { Ok(()) })
    }
}
