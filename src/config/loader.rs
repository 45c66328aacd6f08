//! Load `ServiceConfig` from environment variables.

use crate::config::types::ServiceConfig;
use crate::error::ConfigError;
use std::str::FromStr;

impl ServiceConfig {
    /// Read config from the process environment. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = ServiceConfig::default();
        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(v) = get("PORT") {
            config.port = parse("PORT", v)?;
        }
        if let Some(v) = get("DB_MAX_CONNECTIONS") {
            config.max_connections = parse("DB_MAX_CONNECTIONS", v)?;
            if config.max_connections == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "DB_MAX_CONNECTIONS",
                    value: "0".into(),
                });
            }
        }
        if let Some(v) = get("BODY_LIMIT_BYTES") {
            config.body_limit_bytes = parse("BODY_LIMIT_BYTES", v)?;
        }
        config.public_base_url = get("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string());
        if let Some(filter) = get("LOG_LEVEL") {
            config.log_filter = filter;
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
