//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `JOURNEY` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use journey_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Journeys stored in {}", config.storage.data_dir.display());
//! ```

mod ai;
mod calendar;
mod catalog;
mod error;
mod logging;
mod storage;

pub use ai::AiConfig;
pub use calendar::CalendarConfig;
pub use catalog::{CatalogConfig, STAGE_CEILING, STAGE_FLOOR};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Stage count bounds
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// AI client switches and timeout
    #[serde(default)]
    pub ai: AiConfig,

    /// Progress persistence location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Calendar sync settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `JOURNEY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `JOURNEY__CATALOG__DEFAULT_STAGES=7` -> `catalog.default_stages = 7`
    /// - `JOURNEY__AI__ENABLED=false` -> `ai.enabled = false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("JOURNEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.catalog.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        self.calendar.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("JOURNEY__CATALOG__DEFAULT_STAGES");
        env::remove_var("JOURNEY__CATALOG__MAX_STAGES");
        env::remove_var("JOURNEY__AI__ENABLED");
        env::remove_var("JOURNEY__AI__TIMEOUT_SECS");
        env::remove_var("JOURNEY__STORAGE__DATA_DIR");
        env::remove_var("JOURNEY__CALENDAR__EVENT_DURATION_MINUTES");
        env::remove_var("JOURNEY__LOGGING__JSON");
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.catalog.default_stages, 5);
        assert!(config.ai.enabled);
        assert_eq!(config.calendar.event_duration_minutes, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOURNEY__CATALOG__DEFAULT_STAGES", "7");
        env::set_var("JOURNEY__AI__ENABLED", "false");
        env::set_var("JOURNEY__AI__TIMEOUT_SECS", "5");
        env::set_var("JOURNEY__STORAGE__DATA_DIR", "/tmp/journeys");
        env::set_var("JOURNEY__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.catalog.default_stages, 7);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 5);
        assert_eq!(config.storage.data_dir, std::path::PathBuf::from("/tmp/journeys"));
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOURNEY__CATALOG__MAX_STAGES", "4");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidStageBounds));
    }

    #[test]
    fn test_load_validated_surfaces_validation_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOURNEY__CALENDAR__EVENT_DURATION_MINUTES", "0");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::InvalidEventDuration))
        ));
    }
}
