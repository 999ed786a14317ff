// --- File: crates/pushbridge_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Push Registration Config ---
// Tenant identity and registration defaults. The platform secret may also be
// supplied via env var: APP_PUSH__PLATFORM_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushConfig {
    pub platform_identifier: String,
    pub platform_secret: String,
    pub server_url: String, // Base URL of the registration backend
    pub package_identity: Option<String>,
    pub device_alias: Option<String>,
    pub sender_id: Option<String>,
    /// Installed application version; hosts that track their own build number
    /// override this at runtime.
    pub app_version: Option<i64>,
}

// --- Channel Provider Config ---
// Holds the channel provider (FCM-style token service) settings. The api key
// may be supplied via env var: APP_CHANNEL__API_KEY.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChannelConfig {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    /// Token service endpoint; overridden in tests to point at a mock server.
    pub endpoint: Option<String>,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://pushbridge.db, loaded via APP_DATABASE__URL
}

// --- Top-level Application Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub use_database: bool,

    pub push: Option<PushConfig>,
    pub channel: Option<ChannelConfig>,
    pub database: Option<DatabaseConfig>,
}
