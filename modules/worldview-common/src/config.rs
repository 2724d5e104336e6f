use std::env;

use crate::error::{Result, WorldviewError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Data provider
    pub world_api_url: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let web_port = match lookup("WEB_PORT") {
            Some(port) => port.parse::<u16>().map_err(|_| {
                WorldviewError::Config(format!("WEB_PORT must be a number, got {port:?}"))
            })?,
            None => 3000,
        };

        Ok(Self {
            world_api_url: required(&lookup, "WORLD_API_URL")?,
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WorldviewError::Config(format!("{key} environment variable is required")))
}
