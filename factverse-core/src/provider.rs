//! FactProvider - the primary public API for getting facts.
//!
//! Combines the local fact table and the optional remote generator behind a
//! single call that always yields usable text. Remote failures of any kind
//! fall back to the local table; a category with no data anywhere yields an
//! ERROR-tagged placeholder.

use crate::remote::RemoteFactClient;
use crate::seen::SeenFacts;
use crate::store::FactStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Where a fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Local,
    Remote,
    Error,
}

impl Provenance {
    /// Short tag used in the saved-facts file.
    pub fn tag(self) -> &'static str {
        match self {
            Provenance::Local => "DB",
            Provenance::Remote => "AI",
            Provenance::Error => "ERR",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provenance::Local => "LOCAL",
            Provenance::Remote => "REMOTE",
            Provenance::Error => "ERROR",
        })
    }
}

/// A fact and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactEntry {
    pub text: String,
    pub provenance: Provenance,
}

impl FactEntry {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    /// The placeholder returned when no source has anything for `category`.
    pub fn unavailable(category: &str) -> Self {
        Self::new(
            format!("No facts available for category: {category}"),
            Provenance::Error,
        )
    }

    pub fn is_error(&self) -> bool {
        self.provenance == Provenance::Error
    }
}

/// Snapshot of what a provider can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    pub remote_available: bool,
    pub backend: Option<String>,
    pub local_facts_loaded: bool,
    pub local_fact_count: usize,
    pub categories: Vec<String>,
    pub seen_this_session: usize,
}

/// Hands out facts for a session.
///
/// Owns the session's [`SeenFacts`]; dropping the provider (or calling
/// [`reset_session`](Self::reset_session)) ends the session.
pub struct FactProvider {
    store: Arc<FactStore>,
    remote: Option<RemoteFactClient>,
    seen: SeenFacts,
    rng: StdRng,
    dedupe_local: bool,
}

impl FactProvider {
    /// Create a provider over a local store with remote generation disabled.
    pub fn new(store: Arc<FactStore>) -> Self {
        Self {
            store,
            remote: None,
            seen: SeenFacts::new(),
            rng: StdRng::from_entropy(),
            dedupe_local: false,
        }
    }

    /// Enable remote generation.
    pub fn with_remote(mut self, remote: RemoteFactClient) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set (or clear) the remote generator.
    pub fn with_optional_remote(mut self, remote: Option<RemoteFactClient>) -> Self {
        self.remote = remote;
        self
    }

    /// Seed the local-pick RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Also avoid repeating local facts until a category is exhausted.
    pub fn with_local_dedupe(mut self, dedupe_local: bool) -> Self {
        self.dedupe_local = dedupe_local;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    pub fn seen(&self) -> &SeenFacts {
        &self.seen
    }

    /// Forget everything returned so far and start a fresh session.
    pub fn reset_session(&mut self) {
        self.seen.clear();
    }

    /// Get a fact, preferring the remote generator when asked and available.
    pub async fn get_fact(&mut self, category: &str, prefer_remote: bool) -> FactEntry {
        self.get_fact_until(category, prefer_remote, std::future::pending())
            .await
    }

    /// Like [`get_fact`](Self::get_fact), but a pending remote request is
    /// abandoned as soon as `interrupt` completes and the local table is used
    /// instead.
    pub async fn get_fact_until<F>(
        &mut self,
        category: &str,
        prefer_remote: bool,
        interrupt: F,
    ) -> FactEntry
    where
        F: Future<Output = ()>,
    {
        if prefer_remote {
            if let Some(remote) = self.remote.as_mut() {
                let outcome = tokio::select! {
                    result = remote.generate(category, &mut self.seen) => Some(result),
                    _ = interrupt => None,
                };

                match outcome {
                    Some(Ok(text)) => return FactEntry::new(text, Provenance::Remote),
                    Some(Err(e)) => {
                        tracing::warn!(category, reason = e.reason(), error = %e, "remote generation failed, using local facts");
                    }
                    None => {
                        tracing::warn!(category, "remote generation interrupted, using local facts");
                    }
                }
            }
        }

        self.local_fact(category)
    }

    /// Pick from the local table only.
    pub fn local_fact(&mut self, category: &str) -> FactEntry {
        let picked = if self.dedupe_local {
            let seen = &self.seen;
            self.store
                .pick_preferring(category, &mut self.rng, |fact| seen.contains(fact))
        } else {
            self.store.pick_with_rng(category, &mut self.rng)
        };

        match picked {
            Some(text) => {
                let text = text.to_string();
                if self.dedupe_local {
                    self.seen.insert(&text);
                }
                FactEntry::new(text, Provenance::Local)
            }
            None => {
                tracing::warn!(category, "no facts available");
                FactEntry::unavailable(category)
            }
        }
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            remote_available: self.remote.is_some(),
            backend: self.remote.as_ref().map(|r| r.backend_name().to_string()),
            local_facts_loaded: !self.store.is_empty(),
            local_fact_count: self.store.total_facts(),
            categories: self.store.categories().map(str::to_string).collect(),
            seen_this_session: self.seen.len(),
        }
    }
}
