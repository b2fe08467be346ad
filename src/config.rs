//! Configuration management for the RAX chat server
//!
//! Values come from built-in defaults, then an optional `config.toml`
//! in the working directory, then `RAX_CHAT_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4444;
const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// Server configuration, loaded once at startup
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address the listening socket binds to
    /// Environment: RAX_CHAT_BIND_ADDRESS
    pub bind_address: String,

    /// TCP port clients connect to
    /// Environment: RAX_CHAT_PORT
    pub port: u16,

    /// Longest display name accepted during the handshake, in bytes
    /// Environment: RAX_CHAT_MAX_NAME_LENGTH
    pub max_name_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, `config.toml` and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("max_name_length", DEFAULT_MAX_NAME_LENGTH as i64)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("RAX_CHAT").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.max_name_length == 0 {
            return Err(config::ConfigError::Message(
                "max_name_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a `host:port` string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
