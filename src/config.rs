use crate::errors::ConfigError;
use crate::storage::resolve_data_path;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub access_key: String,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let access_key = lookup("ACCESS_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_KEY"))?;

        Ok(Self {
            port,
            data_path: resolve_data_path(lookup("APP_DATA_PATH")),
            access_key,
            catalog_path: lookup("STATE_CATALOG_PATH").map(PathBuf::from),
        })
    }
}
