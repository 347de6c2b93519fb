//! Demo server configuration.
//!
//! Read from an optional TOML file named by `CODE_SERVER_CONFIG`; `PORT`
//! overrides the configured port.

use std::collections::BTreeMap;
use std::path::Path;

use code_core::{CodeHandlerConfig, CodeRecord};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "CODE_SERVER_CONFIG";
pub const PORT_ENV: &str = "PORT";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bodies larger than this cannot be read and are treated as missing.
    pub max_body_bytes: usize,
    pub handler: CodeHandlerConfig,
    /// Seed data for the in-memory loader, keyed by master category.
    pub codes: BTreeMap<String, Vec<CodeRecord>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 64 * 1024,
            handler: CodeHandlerConfig::default(),
            codes: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_env() -> Result<Self, ServerError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        if let Ok(port) = std::env::var(PORT_ENV) {
            config.port = port
                .parse()
                .map_err(|_| ServerError::Config(format!("{PORT_ENV} is not a port: {port}")))?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
