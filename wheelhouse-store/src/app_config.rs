use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Pending bookings older than this are cancelled by the sweeper.
    #[serde(default = "default_pending_expiry_hours")]
    pub pending_expiry_hours: u64,
    #[serde(default = "default_sweep_interval")]
    pub expiry_sweep_interval_seconds: u64,
}

fn default_pending_expiry_hours() -> u64 {
    72
}

fn default_sweep_interval() -> u64 {
    3600
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration, always present
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `WHEELHOUSE_SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("WHEELHOUSE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
