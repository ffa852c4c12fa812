// --- File: crates/schedulify_config/src/lib.rs ---
//! Configuration loading for Schedulify.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults (every field has one),
//! 2. an optional config file (path from `SCHEDULIFY_CONFIG`, default
//!    `config/default`, any format the `config` crate understands),
//! 3. `SCHEDULIFY__`-prefixed environment variables with `__` separators,
//!    e.g. `SCHEDULIFY__SCHEDULING__WORK_END_TIME=18:00`.

pub mod models;

use std::env;
use std::sync::OnceLock;

use config::{Config, ConfigError, Environment, File};
use tracing::debug;

pub use models::{AppConfig, SchedulingConfig};

static INIT_DOTENV: OnceLock<()> = OnceLock::new();

/// Loads `.env` exactly once per process. `DOTENV_OVERRIDE` names an
/// alternative file.
pub fn ensure_dotenv_loaded() {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());
    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });
}

/// Loads the application configuration.
///
/// Dependent crates call this so they do not need to know where configuration
/// comes from; missing file and missing variables both fall back to defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let file_path =
        env::var("SCHEDULIFY_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    debug!("Loading configuration (file source: {})", file_path);

    let config = Config::builder()
        .add_source(File::with_name(&file_path).required(false))
        .add_source(
            Environment::with_prefix("SCHEDULIFY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
