//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `TOOLROOM` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use toolroom::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod accounting;
mod database;
mod error;
mod logging;

pub use accounting::AccountingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cycle accounting behaviour
    #[serde(default)]
    pub accounting: AccountingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `TOOLROOM__*` variables:
    ///
    /// - `TOOLROOM__DATABASE__URL=...` -> `database.url`
    /// - `TOOLROOM__LOGGING__JSON=true` -> `logging.json`
    /// - `TOOLROOM__ACCOUNTING__CLAMP_NEGATIVE_PARTIALS=false` -> `accounting.clamp_negative_partials`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or can't be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TOOLROOM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "TOOLROOM__DATABASE__URL",
        "TOOLROOM__DATABASE__RUN_MIGRATIONS",
        "TOOLROOM__LOGGING__JSON",
        "TOOLROOM__ACCOUNTING__CLAMP_NEGATIVE_PARTIALS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TOOLROOM__DATABASE__URL", "postgresql://press@localhost/toolroom");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://press@localhost/toolroom");
        assert!(!config.database.run_migrations);
        assert_eq!(config.logging.level, "info");
        assert!(config.accounting.clamp_negative_partials);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TOOLROOM__DATABASE__URL", "postgresql://press@localhost/toolroom");
        env::set_var("TOOLROOM__DATABASE__RUN_MIGRATIONS", "true");
        env::set_var("TOOLROOM__LOGGING__JSON", "true");
        env::set_var("TOOLROOM__ACCOUNTING__CLAMP_NEGATIVE_PARTIALS", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.database.run_migrations);
        assert!(config.logging.json);
        assert!(!config.accounting.clamp_negative_partials);
    }

    #[test]
    fn missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
