//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod booking;
pub mod cache;
pub mod database;
pub mod lock;
pub mod logging;
pub mod realtime;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::booking::BookingConfig;
pub use self::cache::CacheConfig;
pub use self::database::{DatabaseConfig, StoreConfig, StoreProvider};
pub use self::lock::{LockConfig, LockProvider, RedisLockConfig};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::worker::ReaperConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay) and `BOXOFFICE__*`
/// environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Record store backend selection.
    pub store: StoreConfig,
    /// Lock coordinator settings.
    pub lock: LockConfig,
    /// Hold/booking protocol settings.
    pub booking: BookingConfig,
    /// Expiry reaper settings.
    pub reaper: ReaperConfig,
    /// Live feed settings.
    pub realtime: RealtimeConfig,
    /// Bearer token settings.
    pub auth: AuthConfig,
    /// Event metadata cache settings.
    pub cache: CacheConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and
    /// environment variables prefixed with `BOXOFFICE__`, then validates
    /// the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BOXOFFICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.booking.validate()?;
        self.reaper.validate()?;
        if self.realtime.observer_buffer_size == 0 {
            return Err(AppError::configuration(
                "realtime.observer_buffer_size must be greater than zero",
            ));
        }
        Ok(())
    }
}
