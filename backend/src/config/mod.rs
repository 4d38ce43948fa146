//! Application configuration management

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite URL, e.g. `sqlite://./data/protocol.db`
    pub database_url: String,

    /// Connection pool size
    pub database_max_connections: u32,

    pub log_format: LogFormat,

    /// Insert lookup rows at startup
    pub seed_database: bool,
}

impl Config {
    /// Load configuration from `.env` and environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => anyhow::bail!("Invalid LOG_FORMAT: {} (expected json or pretty)", other),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://./data/protocol.db".to_string()),

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            log_format,

            seed_database: lookup("SEED_DATABASE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }

    /// Socket address to listen on
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid HOST/PORT: {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.database_url, "sqlite://./data/protocol.db");
        assert_eq!(cfg.database_max_connections, 10);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(cfg.seed_database);
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("LOG_FORMAT", "pretty"),
            ("SEED_DATABASE", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(!cfg.seed_database);
    }

    #[test]
    fn invalid_numbers_are_errors() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
