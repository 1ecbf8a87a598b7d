use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub api_prefix: String,

    // Storage
    pub db_max_connections: u32,
    pub db_command_timeout_secs: u64,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        fn parsed<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            match value {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} has an invalid value: {v}")),
                None => Ok(default),
            }
        }

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            db_max_connections: parsed(lookup("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            db_command_timeout_secs: parsed(
                lookup("DB_COMMAND_TIMEOUT_SECS"),
                "DB_COMMAND_TIMEOUT_SECS",
                30,
            )?,

            rate_api_per_min: parsed(lookup("RATE_API_PER_MIN"), "RATE_API_PER_MIN", 1000)?,

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "debug".to_string()),
        };

        if config.rate_api_per_min == 0 {
            return Err(anyhow!("RATE_API_PER_MIN must be greater than zero"));
        }

        Ok(config)
    }
}
