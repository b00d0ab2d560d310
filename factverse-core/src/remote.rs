//! Remote fact generation.
//!
//! [`RemoteFactClient`] asks a [`TextBackend`] for one sentence about a
//! category, cleans and validates the reply, and retries on transient
//! failures, degenerate replies, and duplicates. Every backend call is
//! bounded by the configured request timeout.

use crate::config::RemoteConfig;
use crate::prompts::{self, SYSTEM_INSTRUCTION};
use crate::seen::SeenFacts;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use thiserror::Error;

/// Error returned by a [`TextBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Worth retrying (network, timeout, rate limit, server error).
    #[error("transient backend failure: {0}")]
    Transient(String),

    /// Retrying will not help (bad credential, rejected request).
    #[error("backend rejected request: {0}")]
    Fatal(String),
}

impl From<completions::Error> for BackendError {
    fn from(e: completions::Error) -> Self {
        if e.is_transient() {
            BackendError::Transient(e.to_string())
        } else {
            BackendError::Fatal(e.to_string())
        }
    }
}

/// Why a single attempt did not produce a fact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("transient backend failure: {0}")]
    Transient(String),

    #[error("degenerate response ({length} chars)")]
    Degenerate { length: usize },

    #[error("duplicate of a fact already returned this session")]
    Duplicate,
}

/// Terminal outcome of [`RemoteFactClient::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("no usable fact after {attempts} attempts")]
    ExhaustedRetries {
        attempts: u32,
        last_failure: Option<AttemptFailure>,
    },

    #[error("backend error: {detail}")]
    Backend { detail: String },
}

impl RemoteError {
    /// Short machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            RemoteError::ExhaustedRetries { .. } => "exhausted-retries",
            RemoteError::Backend { .. } => "backend-error",
        }
    }
}

/// Fixed sampling parameters for fact generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        // Higher than default temperature to reduce repetition.
        Self {
            max_tokens: 80,
            temperature: 0.9,
            top_p: 0.95,
            frequency_penalty: 0.5,
            presence_penalty: 0.3,
        }
    }
}

/// One fully-formed generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub sampling: Sampling,
}

/// A text-generation service that answers one prompt with one reply.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Send the prompt and return the raw reply text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError>;

    /// Name for logs and status output.
    fn name(&self) -> &str;
}

/// [`TextBackend`] backed by an OpenAI-compatible chat completions endpoint.
pub struct ChatBackend {
    client: completions::Client,
    name: String,
}

impl ChatBackend {
    pub fn new(client: completions::Client) -> Self {
        let name = format!("{} @ {}", client.model(), client.base_url());
        Self { client, name }
    }
}

#[async_trait]
impl TextBackend for ChatBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let request = completions::Request::new(vec![completions::Message::user(&prompt.user)])
            .with_system(&prompt.system)
            .with_max_tokens(prompt.sampling.max_tokens)
            .with_temperature(prompt.sampling.temperature)
            .with_top_p(prompt.sampling.top_p)
            .with_frequency_penalty(prompt.sampling.frequency_penalty)
            .with_presence_penalty(prompt.sampling.presence_penalty);

        let response = self.client.complete(request).await?;
        Ok(response.text().to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Retry policy and validation thresholds.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Total attempts per call, including the first.
    pub max_retries: u32,
    /// Delay after a transient failure before the next attempt.
    pub backoff: Duration,
    /// Upper bound on a single backend call.
    pub request_timeout: Duration,
    /// Replies shorter than this (in chars) are treated as degenerate.
    pub min_length: usize,
    pub sampling: Sampling,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            min_length: 15,
            sampling: Sampling::default(),
        }
    }
}

/// Generates facts through a [`TextBackend`] with validation and retry.
pub struct RemoteFactClient {
    backend: Box<dyn TextBackend>,
    settings: RemoteSettings,
    rng: StdRng,
}

impl RemoteFactClient {
    pub fn new(backend: impl TextBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            settings: RemoteSettings::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when no credential is configured: remote generation
    /// is simply disabled in that case.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>, completions::Error> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        let client = completions::Client::new(api_key)?
            .with_base_url(&config.base_url)
            .with_model(&config.model)
            .with_timeout(config.request_timeout)?;

        Ok(Some(
            Self::new(ChatBackend::new(client)).with_settings(config.settings()),
        ))
    }

    pub fn with_settings(mut self, settings: RemoteSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Seed the prompt-selection RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate a fact for `category` that is not already in `seen`.
    ///
    /// On success the fact's normalized form has been added to `seen`.
    pub async fn generate(
        &mut self,
        category: &str,
        seen: &mut SeenFacts,
    ) -> Result<String, RemoteError> {
        let max_attempts = self.settings.max_retries.max(1);
        let mut last_failure = None;

        for attempt in 1..=max_attempts {
            tracing::info!(category, attempt, max_attempts, backend = self.backend.name(), "generating remote fact");

            let prompt = self.build_prompt(category);
            let reply = match tokio::time::timeout(
                self.settings.request_timeout,
                self.backend.complete(&prompt),
            )
            .await
            {
                Ok(reply) => reply,
                Err(_) => Err(BackendError::Transient(format!(
                    "no reply within {:?}",
                    self.settings.request_timeout
                ))),
            };

            let failure = match reply {
                Ok(text) => match self.accept(&text, seen) {
                    Ok(fact) => {
                        tracing::info!(category, attempt, "accepted remote fact");
                        return Ok(fact);
                    }
                    Err(failure) => failure,
                },
                Err(BackendError::Fatal(detail)) => {
                    tracing::warn!(category, attempt, %detail, "backend rejected request");
                    return Err(RemoteError::Backend { detail });
                }
                Err(BackendError::Transient(detail)) => AttemptFailure::Transient(detail),
            };

            tracing::warn!(category, attempt, max_attempts, %failure, "remote attempt failed");

            // Only transport failures back off; bad replies retry at once.
            let backs_off = matches!(failure, AttemptFailure::Transient(_));
            last_failure = Some(failure);
            if backs_off && attempt < max_attempts && !self.settings.backoff.is_zero() {
                tokio::time::sleep(self.settings.backoff).await;
            }
        }

        Err(RemoteError::ExhaustedRetries {
            attempts: max_attempts,
            last_failure,
        })
    }

    fn build_prompt(&mut self, category: &str) -> Prompt {
        Prompt {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: prompts::user_prompt(category, &mut self.rng),
            sampling: self.settings.sampling.clone(),
        }
    }

    fn accept(&self, raw: &str, seen: &mut SeenFacts) -> Result<String, AttemptFailure> {
        let fact = clean_response(raw);
        let length = fact.chars().count();
        if length < self.settings.min_length {
            return Err(AttemptFailure::Degenerate { length });
        }
        if !seen.insert(fact) {
            return Err(AttemptFailure::Duplicate);
        }
        Ok(fact.to_string())
    }
}

/// Trim whitespace and one layer of enclosing quotes.
pub fn clean_response(raw: &str) -> &str {
    const QUOTES: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('“', '”')];

    let trimmed = raw.trim();
    for (open, close) in QUOTES {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    trimmed
}
