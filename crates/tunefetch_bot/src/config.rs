//! Process configuration, read once from the environment at startup.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tunefetch_engine::{
    EngineConfig, FetchSettings, DEFAULT_MAX_RESULTS, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SITE_DOMAIN,
};

pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const PORT_VAR: &str = "PORT";
pub const SITE_DOMAIN_VAR: &str = "TRACK_SITE_DOMAIN";
pub const SEARCH_ENDPOINT_VAR: &str = "SEARCH_ENDPOINT";
pub const SCRATCH_DIR_VAR: &str = "SCRATCH_DIR";
pub const MAX_RESULTS_VAR: &str = "MAX_RESULTS";

pub const DEFAULT_PORT: u16 = 5000;
const MAX_RESULTS_LIMIT: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub liveness_port: u16,
    pub site_domain: String,
    pub search_endpoint: String,
    pub scratch_dir: PathBuf,
    pub max_results: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("liveness_port", &self.liveness_port)
            .field("site_domain", &self.site_domain)
            .field("search_endpoint", &self.search_endpoint)
            .field("scratch_dir", &self.scratch_dir)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get(TOKEN_VAR).ok_or(ConfigError::Missing(TOKEN_VAR))?;

        let liveness_port = match get(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|err| ConfigError::Invalid {
                var: PORT_VAR,
                value: raw.clone(),
                reason: err.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let max_results = match get(MAX_RESULTS_VAR) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_RESULTS_LIMIT).contains(&n) => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: MAX_RESULTS_VAR,
                        value: raw,
                        reason: format!("expected a number between 1 and {MAX_RESULTS_LIMIT}"),
                    })
                }
            },
            None => DEFAULT_MAX_RESULTS,
        };

        Ok(Self {
            bot_token,
            liveness_port,
            site_domain: get(SITE_DOMAIN_VAR).unwrap_or_else(|| DEFAULT_SITE_DOMAIN.to_string()),
            search_endpoint: get(SEARCH_ENDPOINT_VAR)
                .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            scratch_dir: get(SCRATCH_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_results,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings::default(),
            search_endpoint: self.search_endpoint.clone(),
            site_domain: self.site_domain.clone(),
            max_results: self.max_results,
        }
    }
}
