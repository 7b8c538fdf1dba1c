use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_FILE_SIZE_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Failed to parse {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub content_root: PathBuf,
    pub file_size_limit: usize,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let file_size_limit = match lookup("FILE_SIZE_LIMIT") {
            Some(value) => value.parse::<usize>().map_err(|_| ConfigError::Invalid {
                name: "FILE_SIZE_LIMIT",
                value,
            })?,
            None => DEFAULT_FILE_SIZE_LIMIT,
        };

        Ok(AppConfig {
            database_url,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            content_root: lookup("CONTENT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            file_size_limit,
            admin_password: lookup("ADMIN_PASSWORD").filter(|value| !value.is_empty()),
        })
    }
}
