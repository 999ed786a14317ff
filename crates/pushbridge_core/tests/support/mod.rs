//! Shared fixtures and recording mock services for the engine tests.

use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};
use pushbridge_common::services::{
    BoxFuture, BoxedError, ChannelService, RegistrationService, RegistrationStateStore,
    VersionProvider,
};
use pushbridge_core::{RegistrationEngine, UnregistrationEngine};
use pushbridge_store::MemoryRegistrationStateStore;
use std::fmt;
use std::sync::{Arc, Mutex};

pub const APP_VERSION: i64 = 3;

/// Simple error type for mock failures.
#[derive(Debug)]
pub struct TestError(pub &'static str);

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TestError {}

fn boxed(message: &'static str) -> BoxedError {
    BoxedError::new(TestError(message))
}

/// Standard parameter bundle used across the scenarios.
pub fn params() -> RegistrationParameters {
    RegistrationParameters::new(
        "tenant-1",
        "secret-1",
        "https://push.example.com",
        "com.example.app",
    )
    .with_device_alias("alias-1")
    .with_sender_id("sender-1")
    .with_tags(["beta"])
}

/// A snapshot that exactly mirrors `params()` registered as token `tok-1`,
/// backend id `dev-1`, app version `APP_VERSION`.
pub fn registered_snapshot() -> RegistrationSnapshot {
    RegistrationSnapshot {
        channel_token: Some("tok-1".into()),
        backend_device_id: Some("dev-1".into()),
        platform_identifier: Some("tenant-1".into()),
        platform_secret: Some("secret-1".into()),
        device_alias: Some("alias-1".into()),
        custom_user_id: None,
        server_url: Some("https://push.example.com".into()),
        sender_id: Some("sender-1".into()),
        package_identity: Some("com.example.app".into()),
        app_version: Some(APP_VERSION),
        tags: Some(["beta".to_string()].into_iter().collect()),
    }
}

// --- Channel mock ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Register(Option<String>),
    Unregister,
}

pub struct MockChannelService {
    available: bool,
    register: Result<String, &'static str>,
    unregister: Result<(), &'static str>,
    calls: Mutex<Vec<ChannelCall>>,
}

impl MockChannelService {
    pub fn returning_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            register: Ok(token.to_string()),
            unregister: Ok(()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_registration(reason: &'static str) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            register: Err(reason),
            unregister: Ok(()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            register: Err("provider unavailable"),
            unregister: Err("provider unavailable"),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_failing_unregister(token: &str, reason: &'static str) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            register: Ok(token.to_string()),
            unregister: Err(reason),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChannelService for MockChannelService {
    type Error = BoxedError;

    fn register(&self, sender_id: Option<&str>) -> BoxFuture<'_, String, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push(ChannelCall::Register(sender_id.map(String::from)));
        let result = self.register.clone();
        Box::pin(async move { result.map_err(boxed) })
    }

    fn unregister(&self) -> BoxFuture<'_, (), Self::Error> {
        self.calls.lock().unwrap().push(ChannelCall::Unregister);
        let result = self.unregister;
        Box::pin(async move { result.map_err(boxed) })
    }

    fn is_provider_available(&self) -> bool {
        self.available
    }
}

// --- Backend mock ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create {
        channel_token: String,
        parameters: RegistrationParameters,
    },
    Update {
        channel_token: String,
        backend_device_id: String,
        parameters: RegistrationParameters,
    },
    Delete {
        backend_device_id: String,
    },
}

pub struct MockRegistrationService {
    create: Result<Option<String>, &'static str>,
    update: Result<Option<String>, &'static str>,
    delete: Result<(), &'static str>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockRegistrationService {
    /// Create and update both resolve to `device_id`; delete succeeds.
    pub fn issuing(device_id: &str) -> Arc<Self> {
        Arc::new(Self {
            create: Ok(Some(device_id.to_string())),
            update: Ok(Some(device_id.to_string())),
            delete: Ok(()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every operation fails with `reason`.
    pub fn failing(reason: &'static str) -> Arc<Self> {
        Arc::new(Self {
            create: Err(reason),
            update: Err(reason),
            delete: Err(reason),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Create and update report success without a device id.
    pub fn malformed() -> Arc<Self> {
        Arc::new(Self {
            create: Ok(None),
            update: Ok(None),
            delete: Ok(()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RegistrationService for MockRegistrationService {
    type Error = BoxedError;

    fn create(
        &self,
        channel_token: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error> {
        self.calls.lock().unwrap().push(BackendCall::Create {
            channel_token: channel_token.to_string(),
            parameters: parameters.clone(),
        });
        let result = self.create.clone();
        Box::pin(async move { result.map_err(boxed) })
    }

    fn update(
        &self,
        channel_token: &str,
        backend_device_id: &str,
        parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, Option<String>, Self::Error> {
        self.calls.lock().unwrap().push(BackendCall::Update {
            channel_token: channel_token.to_string(),
            backend_device_id: backend_device_id.to_string(),
            parameters: parameters.clone(),
        });
        let result = self.update.clone();
        Box::pin(async move { result.map_err(boxed) })
    }

    fn delete(
        &self,
        backend_device_id: &str,
        _parameters: &RegistrationParameters,
    ) -> BoxFuture<'_, (), Self::Error> {
        self.calls.lock().unwrap().push(BackendCall::Delete {
            backend_device_id: backend_device_id.to_string(),
        });
        let result = self.delete;
        Box::pin(async move { result.map_err(boxed) })
    }
}

// --- Version provider ---

pub struct FixedVersionProvider(pub i64);

impl VersionProvider for FixedVersionProvider {
    fn current_app_version(&self) -> i64 {
        self.0
    }
}

// --- Engine wiring helpers ---

pub async fn registration_engine(
    channel: &Arc<MockChannelService>,
    backend: &Arc<MockRegistrationService>,
    store: &Arc<MemoryRegistrationStateStore>,
    app_version: i64,
) -> RegistrationEngine {
    RegistrationEngine::new(
        channel.clone(),
        backend.clone(),
        store.clone(),
        Arc::new(FixedVersionProvider(app_version)),
    )
    .await
    .expect("engine construction loads the snapshot")
}

pub async fn unregistration_engine(
    channel: &Arc<MockChannelService>,
    backend: &Arc<MockRegistrationService>,
    store: &Arc<MemoryRegistrationStateStore>,
) -> UnregistrationEngine {
    UnregistrationEngine::new(channel.clone(), backend.clone(), store.clone())
        .await
        .expect("engine construction loads the snapshot")
}
