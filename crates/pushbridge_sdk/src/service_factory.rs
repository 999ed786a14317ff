//! Service factory implementation.
//!
//! Builds the concrete collaborator services from the application
//! configuration and hands them to the engines behind the `ServiceFactory`
//! seam. Services whose configuration is absent stay `None`; the store falls
//! back to the in-memory implementation when no database is configured or the
//! database cannot be reached.

use pushbridge_backend::{BackendClient, HttpRegistrationService};
use pushbridge_channel::{FcmChannelClient, FcmChannelService};
use pushbridge_common::services::{
    BoxedError, ChannelService, RegistrationService, RegistrationStateStore, ServiceFactory,
    VersionProvider,
};
use pushbridge_config::AppConfig;
use pushbridge_store::{DbClient, MemoryRegistrationStateStore, SqlRegistrationStateStore};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Version provider backed by the static configuration.
///
/// Hosts that track a real build number should supply their own
/// `VersionProvider` instead.
pub struct ConfigVersionProvider {
    version: i64,
}

impl ConfigVersionProvider {
    pub fn new(version: i64) -> Self {
        Self { version }
    }
}

impl VersionProvider for ConfigVersionProvider {
    fn current_app_version(&self) -> i64 {
        self.version
    }
}

/// Service factory for the Pushbridge SDK.
pub struct PushBridgeServiceFactory {
    channel_service: Option<Arc<dyn ChannelService<Error = BoxedError>>>,
    registration_service: Option<Arc<dyn RegistrationService<Error = BoxedError>>>,
    state_store: Option<Arc<dyn RegistrationStateStore<Error = BoxedError>>>,
    version_provider: Option<Arc<dyn VersionProvider>>,
}

impl PushBridgeServiceFactory {
    /// Create a new service factory from the application configuration.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let channel_service: Option<Arc<dyn ChannelService<Error = BoxedError>>> =
            match config.channel.clone() {
                Some(channel_config) => {
                    info!("Initializing channel provider service");
                    let client = Arc::new(FcmChannelClient::new(channel_config));
                    Some(Arc::new(FcmChannelService::new(client)))
                }
                None => {
                    warn!("No channel configuration present, channel service disabled");
                    None
                }
            };

        // The registration client is stateless; server URL and credentials
        // travel in the per-attempt parameter bundle.
        let registration_service: Option<Arc<dyn RegistrationService<Error = BoxedError>>> =
            Some(Arc::new(HttpRegistrationService::new(Arc::new(
                BackendClient::new(),
            ))));

        let state_store = Self::build_state_store(&config).await;

        let version_provider: Option<Arc<dyn VersionProvider>> = Some(Arc::new(
            ConfigVersionProvider::new(
                config
                    .push
                    .as_ref()
                    .and_then(|push| push.app_version)
                    .unwrap_or(0),
            ),
        ));

        Self {
            channel_service,
            registration_service,
            state_store,
            version_provider,
        }
    }

    async fn build_state_store(
        config: &Arc<AppConfig>,
    ) -> Option<Arc<dyn RegistrationStateStore<Error = BoxedError>>> {
        if config.use_database && config.database.is_some() {
            info!("Initializing database-backed registration state store");
            match DbClient::new(config).await {
                Ok(client) => {
                    let store = SqlRegistrationStateStore::new(client);
                    match store.init_schema().await {
                        Ok(()) => return Some(Arc::new(store)),
                        Err(err) => {
                            error!("Failed to initialize registration state schema: {}", err);
                        }
                    }
                }
                Err(err) => {
                    error!("Failed to connect to the registration database: {}", err);
                }
            }
            warn!("Falling back to the in-memory registration state store");
        }
        Some(Arc::new(MemoryRegistrationStateStore::new()))
    }
}

impl ServiceFactory for PushBridgeServiceFactory {
    fn channel_service(&self) -> Option<Arc<dyn ChannelService<Error = BoxedError>>> {
        self.channel_service.clone()
    }

    fn registration_service(&self) -> Option<Arc<dyn RegistrationService<Error = BoxedError>>> {
        self.registration_service.clone()
    }

    fn state_store(&self) -> Option<Arc<dyn RegistrationStateStore<Error = BoxedError>>> {
        self.state_store.clone()
    }

    fn version_provider(&self) -> Option<Arc<dyn VersionProvider>> {
        self.version_provider.clone()
    }
}
