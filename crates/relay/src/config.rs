//! Relay server configuration, read from the environment.

use anyhow::Context;
use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RelayConfig {
    /// Reads `HOST` and `PORT`, after loading a `.env` file if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::var("HOST").ok(), std::env::var("PORT").ok())
    }

    pub fn from_vars(host: Option<String>, port: Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port
                .parse()
                .with_context(|| format!("invalid PORT value {:?}", port))?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
