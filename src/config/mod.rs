use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub uploads_dir: String,
    pub max_file_size_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: "uploads".to_string(),
            max_file_size_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Window for the "expiring soon" report.
    pub expiring_window_days: i64,
    /// Installment count offered when the caller does not ask for one.
    pub default_installment_count: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            expiring_window_days: 7,
            default_installment_count: 3,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://dues.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.uploads_dir", "uploads")?
            .set_default("storage.max_file_size_bytes", 10 * 1024 * 1024)?
            .set_default("billing.expiring_window_days", 7)?
            .set_default("billing.default_installment_count", 3)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with DUES__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("DUES").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://dues.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            storage: StorageConfig::default(),
            billing: BillingConfig::default(),
        }
    }
}
