//! Configuration management for the calendar server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Defaults for the maintenance jobs, overridable from the command line
#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    pub page_size: i64,
    pub workers: usize,
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            // Override database URL from DATABASE_URL env var if present
            .set_override_option(
                "database.url",
                env::var("DATABASE_URL").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

/// `CALENDAR_<SECTION>__<KEY>`, e.g. `CALENDAR_JOBS__PAGE_SIZE=100`.
/// The double underscore keeps keys such as `page_size` in one piece.
fn environment() -> Environment {
    Environment::with_prefix("CALENDAR")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            workers: 4,
            channel_capacity: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_multi_word_keys() {
        let config = AppConfig::load_with(environment().source(Some(vars(&[
            ("CALENDAR_JOBS__PAGE_SIZE", "7"),
            ("CALENDAR_JOBS__CHANNEL_CAPACITY", "3"),
            ("CALENDAR_DATABASE__MAX_CONNECTIONS", "25"),
            ("CALENDAR_SERVER__PORT", "9999"),
        ]))))
        .unwrap();

        assert_eq!(config.jobs.page_size, 7);
        assert_eq!(config.jobs.channel_capacity, 3);
        assert_eq!(config.database.max_connections, 25);
        assert_eq!(config.server.port, 9999);
        // Untouched keys keep the file defaults
        assert_eq!(config.jobs.workers, 4);
    }

    #[test]
    fn test_file_defaults() {
        let config = AppConfig::load_with(environment().source(Some(vars(&[])))).unwrap();
        assert_eq!(config.jobs.page_size, 500);
        assert_eq!(config.logging.format, "pretty");
    }
}
