// ABOUTME: Runtime configuration for Leadflow clients and the chat engine
// ABOUTME: Reads environment variables with defaults and validates them

pub mod constants;

use std::env;
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number for {name}: {source}")]
    InvalidNumber {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL the `/api/...` endpoints are resolved against
    pub api_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub http_connect_timeout: Duration,
    pub context_window: usize,
    pub sync_max_retries: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            http_connect_timeout: Duration::from_secs(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
            context_window: DEFAULT_CONTEXT_WINDOW,
            sync_max_retries: DEFAULT_SYNC_MAX_RETRIES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(LEADFLOW_API_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(api_url));
        }

        let api_token = lookup(LEADFLOW_API_TOKEN).filter(|t| !t.trim().is_empty());

        let http_timeout = parse_number(
            &lookup,
            LEADFLOW_HTTP_TIMEOUT_SECS,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let http_connect_timeout = parse_number(
            &lookup,
            LEADFLOW_HTTP_CONNECT_TIMEOUT_SECS,
            DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
        )?;
        let context_window =
            parse_number(&lookup, LEADFLOW_CONTEXT_WINDOW, DEFAULT_CONTEXT_WINDOW as u64)? as usize;
        // Zero retries is allowed: the mirror then makes a single attempt
        let sync_max_retries = lookup(LEADFLOW_SYNC_MAX_RETRIES)
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|source| ConfigError::InvalidNumber {
                        name: LEADFLOW_SYNC_MAX_RETRIES,
                        source,
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SYNC_MAX_RETRIES);

        let log_filter = lookup(LEADFLOW_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        debug!("Loaded configuration for API at {}", api_url);

        Ok(Config {
            api_url,
            api_token,
            http_timeout: Duration::from_secs(http_timeout),
            http_connect_timeout: Duration::from_secs(http_connect_timeout),
            context_window,
            sync_max_retries,
            log_filter,
        })
    }

    /// Resolve an `/api/...` path against the configured base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn parse_number<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|source| ConfigError::InvalidNumber { name, source })?;

    if value == 0 {
        return Err(ConfigError::Zero(name));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            (LEADFLOW_API_URL, "https://agents.example.com/"),
            (LEADFLOW_CONTEXT_WINDOW, "8"),
            (LEADFLOW_SYNC_MAX_RETRIES, "0"),
            (LEADFLOW_API_TOKEN, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://agents.example.com");
        assert_eq!(config.context_window, 8);
        assert_eq!(config.sync_max_retries, 0);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(
            config.endpoint("/api/chat/smart"),
            "https://agents.example.com/api/chat/smart"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[(LEADFLOW_HTTP_TIMEOUT_SECS, "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[(LEADFLOW_CONTEXT_WINDOW, "0")])),
            Err(ConfigError::Zero(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[(LEADFLOW_API_URL, "localhost:3000")])),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var(LEADFLOW_HTTP_TIMEOUT_SECS, "45");
        let config = Config::from_env().unwrap();
        env::remove_var(LEADFLOW_HTTP_TIMEOUT_SECS);

        assert_eq!(config.http_timeout, Duration::from_secs(45));
    }
}
