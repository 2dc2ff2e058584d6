use dotenvy::dotenv;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_LOG_FILE: &str = "pmo.log";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing mandatory store parameter {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] envy::Error),
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Record store connection URL (host and credentials)
    #[serde(default)]
    pub database_url: String,
    /// Namespace of the PMO+ records inside the store
    #[serde(default)]
    pub pmo_project_id: String,
    pub pmo_log_file: Option<String>,
    pub pmo_max_connections: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    /// 3. Reject the configuration if a mandatory parameter is absent
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()
    }

    /// Same as [`Config::load`] but reads from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.pmo_project_id.trim().is_empty() {
            return Err(ConfigError::Missing("PMO_PROJECT_ID"));
        }
        Ok(self)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn project_id(&self) -> &str {
        &self.pmo_project_id
    }

    pub fn log_file(&self) -> &str {
        self.pmo_log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }

    pub fn max_connections(&self) -> u32 {
        self.pmo_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config, ConfigError> {
    Config::load()
}
