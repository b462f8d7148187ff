//! Application configuration management.
//!
//! Configuration is loaded once at startup and handed to the components that
//! need it; no part of the system reads ambient global state after boot.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

fn default_token_expiry_hours() -> i64 {
    8
}

/// Blob storage configuration.
///
/// The `provider` field selects the backend; provider-specific fields are
/// only consulted for the matching provider.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage provider: `local_fs`, `s3`, or `azure_blob`.
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    /// Root directory for `local_fs`.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Endpoint URL for `s3`.
    #[serde(default)]
    pub endpoint: String,
    /// Bucket name for `s3`.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID for `s3`.
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key for `s3`.
    #[serde(default)]
    pub secret_access_key: String,
    /// Region for `s3`.
    #[serde(default)]
    pub region: String,
    /// Account name for `azure_blob`.
    #[serde(default)]
    pub account: String,
    /// Access key for `azure_blob`.
    #[serde(default)]
    pub access_key: String,
    /// Container name for `azure_blob`.
    #[serde(default)]
    pub container: String,
}

fn default_storage_provider() -> String {
    "local_fs".to_string()
}

fn default_storage_root() -> String {
    "./uploads".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            root: default_storage_root(),
            endpoint: String::new(),
            bucket: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: String::new(),
            account: String::new(),
            access_key: String::new(),
            container: String::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QMS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
