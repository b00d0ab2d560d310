//! Testing utilities.
//!
//! This module provides tools for deterministic tests without network access:
//! - `StubBackend`, a scripted [`TextBackend`]
//! - `StubHandle` for inspecting calls after the stub has been moved into a client
//! - `fast_settings` with no backoff and a short timeout

use crate::remote::{BackendError, Prompt, RemoteSettings, TextBackend};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A scripted reply from the stub backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubReply {
    /// Reply with this text.
    Text(String),
    /// Fail with a retryable error.
    Transient(String),
    /// Fail with a non-retryable error.
    Fatal(String),
    /// Never answer.
    Hang,
}

impl StubReply {
    pub fn text(text: impl Into<String>) -> Self {
        StubReply::Text(text.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        StubReply::Transient(message.into())
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        StubReply::Fatal(message.into())
    }
}

/// A backend that returns scripted replies in order, then repeats a fallback.
pub struct StubBackend {
    script: Mutex<VecDeque<StubReply>>,
    fallback: StubReply,
    handle: StubHandle,
}

/// Shared view of what a [`StubBackend`] was asked.
#[derive(Debug, Clone, Default)]
pub struct StubHandle {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl StubHandle {
    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StubBackend {
    /// Replies in order; once exhausted, fails transiently.
    pub fn scripted(replies: Vec<StubReply>) -> Self {
        Self::with_fallback(replies, StubReply::transient("script exhausted"))
    }

    /// Replies in order; once exhausted, repeats `fallback` forever.
    pub fn with_fallback(replies: Vec<StubReply>, fallback: StubReply) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            handle: StubHandle::default(),
        }
    }

    /// Every call fails transiently.
    pub fn always_failing() -> Self {
        Self::with_fallback(Vec::new(), StubReply::transient("connection refused"))
    }

    /// Every call returns the same text.
    pub fn repeating(text: impl Into<String>) -> Self {
        Self::with_fallback(Vec::new(), StubReply::text(text))
    }

    /// Every call hangs until cancelled or timed out.
    pub fn hanging() -> Self {
        Self::with_fallback(Vec::new(), StubReply::Hang)
    }

    pub fn handle(&self) -> StubHandle {
        self.handle.clone()
    }

    fn next_reply(&self) -> StubReply {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl TextBackend for StubBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        self.handle.calls.fetch_add(1, Ordering::SeqCst);
        self.handle
            .prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.clone());

        match self.next_reply() {
            StubReply::Text(text) => Ok(text),
            StubReply::Transient(message) => Err(BackendError::Transient(message)),
            StubReply::Fatal(message) => Err(BackendError::Fatal(message)),
            StubReply::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Default retry policy without the backoff delay, for fast tests.
pub fn fast_settings() -> RemoteSettings {
    RemoteSettings {
        backoff: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        ..RemoteSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Sampling;

    fn prompt() -> Prompt {
        Prompt {
            system: "system".into(),
            user: "user".into(),
            sampling: Sampling::default(),
        }
    }

    #[tokio::test]
    async fn test_script_then_fallback() {
        let stub = StubBackend::with_fallback(
            vec![StubReply::text("first"), StubReply::fatal("second")],
            StubReply::text("again"),
        );
        let handle = stub.handle();

        assert_eq!(stub.complete(&prompt()).await, Ok("first".to_string()));
        assert!(matches!(stub.complete(&prompt()).await, Err(BackendError::Fatal(_))));
        assert_eq!(stub.complete(&prompt()).await, Ok("again".to_string()));
        assert_eq!(stub.complete(&prompt()).await, Ok("again".to_string()));
        assert_eq!(handle.calls(), 4);
        assert_eq!(handle.prompts().len(), 4);
    }

    #[tokio::test]
    async fn test_always_failing() {
        let stub = StubBackend::always_failing();
        for _ in 0..3 {
            assert!(matches!(
                stub.complete(&prompt()).await,
                Err(BackendError::Transient(_))
            ));
        }
    }
}
