// Runtime configuration read from the environment (.env is loaded by main)

use std::path::PathBuf;

use thiserror::Error;

const MEMORY_URL_SCHEME: &str = "memory://";

/// Where records are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Postgres(String),
    /// Volatile store, chosen with `DATABASE_URL=memory://`
    Memory,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Lifetime of issued tokens, in seconds
    pub token_ttl_seconds: i64,
    pub upload_dir: PathBuf,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let storage = if database_url.starts_with(MEMORY_URL_SCHEME) {
            Storage::Memory
        } else {
            Storage::Postgres(database_url)
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            storage,
            jwt_secret,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            token_ttl_seconds: parse_or(&lookup, "TOKEN_TTL_SECONDS", 86_400)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
