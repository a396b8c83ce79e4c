//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `127.0.0.1` | bind address |
//! | `PORT` | `3000` | bind port |
//! | `STORAGE_MODE` | `sqlite` | `sqlite` or `in_memory` |
//! | `DATABASE_URL` | `sqlite://todo.db` | SQLite URL, used when `STORAGE_MODE=sqlite` |
//! | `LOG_FORMAT` | `pretty` | `pretty` or `json` |
//!
//! `RUST_LOG` is read separately by the tracing filter.

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT='{0}' is not a valid port number")]
    InvalidPort(String),

    #[error("STORAGE_MODE='{0}' is not one of: sqlite, in_memory")]
    UnknownStorageMode(String),

    #[error("LOG_FORMAT='{0}' is not one of: pretty, json")]
    UnknownLogFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Sqlite,
    InMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageMode,
    pub database_url: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, which maps a variable name to its value.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let storage = match var("STORAGE_MODE").as_deref() {
            None | Some("sqlite") => StorageMode::Sqlite,
            Some("in_memory") | Some("memory") => StorageMode::InMemory,
            Some(other) => return Err(ConfigError::UnknownStorageMode(other.to_string())),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::UnknownLogFormat(other.to_string())),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            storage,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
