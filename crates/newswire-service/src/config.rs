use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::upstream::newsapi::DEFAULT_BASE_URL;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent keys are tolerated at startup; headline requests then fail.
    pub news_api_key: Option<String>,
    pub news_api_base_url: Url,
    pub bind_address: SocketAddr,
    pub category_hints: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let base_url = get("NEWS_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let news_api_base_url = Url::parse(&base_url).map_err(|err| ConfigError::Invalid {
            name: "NEWS_API_BASE_URL",
            value: base_url.clone(),
            reason: err.to_string(),
        })?;

        let bind = get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind.parse().map_err(|err: std::net::AddrParseError| {
            ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: bind.clone(),
                reason: err.to_string(),
            }
        })?;

        let category_hints = match get("NEWS_CATEGORY_HINTS") {
            None => false,
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::Invalid {
                name: "NEWS_CATEGORY_HINTS",
                value,
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(Config {
            database_url,
            news_api_key: get("NEWS_API_KEY"),
            news_api_base_url,
            bind_address,
            category_hints,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
