use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

/// Server settings read from `HOST`, `PORT`, `WORKERS` and `MAX_BODY_BYTES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let workers = parse_var(&lookup, "WORKERS", num_cpus::get())?;
        let max_body_bytes = parse_var(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;

        if workers == 0 {
            return Err(invalid("WORKERS", "0", "must be at least 1"));
        }
        if max_body_bytes == 0 {
            return Err(invalid("MAX_BODY_BYTES", "0", "must be at least 1"));
        }

        Ok(Config {
            host,
            port,
            workers,
            max_body_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, e.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}
