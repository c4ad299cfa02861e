//! Server configuration from the environment.

use anyhow::Context;
use std::path::PathBuf;

/// Runtime settings read from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one deck file per user (`DATA_DIR`).
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("user_data"),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            None => defaults.port,
        };

        Ok(Self {
            data_dir: lookup("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
