//! Configuration built once at startup and passed down explicitly.

use crate::remote::{RemoteSettings, Sampling};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = completions::API_KEY_VAR;
pub const BASE_URL_VAR: &str = "FACTVERSE_BASE_URL";
pub const MODEL_VAR: &str = "FACTVERSE_MODEL";
pub const FACTS_VAR: &str = "FACTVERSE_FACTS";
pub const OUTPUT_VAR: &str = "FACTVERSE_OUTPUT";
pub const MAX_RETRIES_VAR: &str = "FACTVERSE_MAX_RETRIES";
pub const TIMEOUT_VAR: &str = "FACTVERSE_TIMEOUT_SECS";

pub const DEFAULT_FACTS_PATH: &str = "facts.json";
pub const DEFAULT_OUTPUT_PATH: &str = "saved_facts.txt";

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the remote generator.
///
/// `api_key == None` disables remote generation.
#[derive(Clone)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
    pub min_length: usize,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("min_length", &self.min_length)
            .finish()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let settings = RemoteSettings::default();
        Self {
            api_key: None,
            base_url: completions::DEFAULT_BASE_URL.to_string(),
            model: completions::DEFAULT_MODEL.to_string(),
            request_timeout: settings.request_timeout,
            max_retries: settings.max_retries,
            backoff: settings.backoff,
            min_length: settings.min_length,
        }
    }
}

impl RemoteConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Disable remote generation regardless of the credential.
    pub fn disabled(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Retry policy for the remote client.
    pub fn settings(&self) -> RemoteSettings {
        RemoteSettings {
            max_retries: self.max_retries,
            backoff: self.backoff,
            request_timeout: self.request_timeout,
            min_length: self.min_length,
            sampling: Sampling::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct FactverseConfig {
    /// JSON fact table.
    pub facts_path: PathBuf,
    /// Append-only file for saved facts.
    pub output_path: PathBuf,
    pub remote: RemoteConfig,
    /// Also avoid repeating local facts within a session.
    pub dedupe_local: bool,
    /// Seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for FactverseConfig {
    fn default() -> Self {
        Self {
            facts_path: PathBuf::from(DEFAULT_FACTS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            remote: RemoteConfig::default(),
            dedupe_local: false,
            seed: None,
        }
    }
}

impl FactverseConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        config.remote.api_key = get(API_KEY_VAR).map(|v| v.trim().to_string());
        if let Some(url) = get(BASE_URL_VAR) {
            config.remote.base_url = url;
        }
        if let Some(model) = get(MODEL_VAR) {
            config.remote.model = model;
        }
        if let Some(path) = get(FACTS_VAR) {
            config.facts_path = PathBuf::from(path);
        }
        if let Some(path) = get(OUTPUT_VAR) {
            config.output_path = PathBuf::from(path);
        }
        if let Some(value) = get(MAX_RETRIES_VAR) {
            config.remote.max_retries = parse_var(MAX_RETRIES_VAR, &value)?;
        }
        if let Some(value) = get(TIMEOUT_VAR) {
            let secs: u64 = parse_var(TIMEOUT_VAR, &value)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: TIMEOUT_VAR,
                    value,
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.remote.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_facts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.facts_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_dedupe_local(mut self, dedupe_local: bool) -> Self {
        self.dedupe_local = dedupe_local;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
