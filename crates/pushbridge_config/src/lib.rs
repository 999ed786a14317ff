//! Layered configuration loading for the Pushbridge SDK.
//!
//! Configuration is merged from three sources, later sources winning:
//! `config/default.*` files, `config/{RUN_ENV}.*` files, and `APP`-prefixed
//! environment variables (`APP_PUSH__SERVER_URL`, `APP_DATABASE__URL`, ...).

use config::{Config, Environment, File};
pub use config::ConfigError;
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        // Missing .env is fine; env vars may come from the real environment.
        let _ = dotenv::dotenv();
    });
}

/// Load the application configuration from files and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "APP".to_string());

    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator("_")
                .separator("__"),
        );

    builder.build()?.try_deserialize()
}
