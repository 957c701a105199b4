//! Service configuration.
//!
//! Values are resolved in this order, later sources winning:
//! 1. Built-in defaults
//! 2. TOML file (`$HR_JOKES_CONFIG`, else `hr-jokes.toml` if present)
//! 3. Environment variables (`HR_JOKES_*`)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::pagination::DEFAULT_PAGE_SIZE;

pub const ENV_PREFIX: &str = "HR_JOKES_";
pub const CONFIG_PATH_VAR: &str = "HR_JOKES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "hr-jokes.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub dataset_path: PathBuf,
    pub static_dir: PathBuf,
    pub page_size: usize,
    pub max_connections: u32,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite://data/app_data.db".to_string(),
            dataset_path: PathBuf::from("data/data.json"),
            static_dir: PathBuf::from("static"),
            page_size: DEFAULT_PAGE_SIZE,
            max_connections: 5,
            log_filter: "hr_jokes=info,web_server=info,database=info,jokes_core=info,tower_http=info"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file and process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);

        let base = match &explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        info!(path = %path.display(), "Read configuration file");
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `HR_JOKES_<FIELD>` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |field: &str| lookup(&format!("{ENV_PREFIX}{}", field.to_uppercase()));

        if let Some(host) = var("host") {
            self.host = host;
        }
        if let Some(port) = var("port") {
            self.port = parse_field("port", &port)?;
        }
        if let Some(url) = var("database_url") {
            self.database_url = url;
        }
        if let Some(path) = var("dataset_path") {
            self.dataset_path = PathBuf::from(path);
        }
        if let Some(dir) = var("static_dir") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(size) = var("page_size") {
            self.page_size = parse_field("page_size", &size)?;
        }
        if let Some(max) = var("max_connections") {
            self.max_connections = parse_field("max_connections", &max)?;
        }
        if let Some(filter) = var("log_filter") {
            self.log_filter = filter;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "page_size must be at least 1".to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "max_connections must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
