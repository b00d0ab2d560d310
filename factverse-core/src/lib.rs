//! Fact provider with local fact tables and LLM-generated facts.
//!
//! This crate provides:
//! - A local fact table keyed by category
//! - A remote generator with retries, reply validation and per-session deduplication
//! - A provider that prefers the remote generator and silently falls back to local facts
//! - An append-only recorder for saved facts
//!
//! # Quick Start
//!
//! ```ignore
//! use factverse_core::{FactProvider, FactStore, FactverseConfig, RemoteFactClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FactverseConfig::from_env()?;
//!     let store = Arc::new(FactStore::load(&config.facts_path).await?);
//!     let remote = RemoteFactClient::from_config(&config.remote)?;
//!
//!     let mut provider = FactProvider::new(store).with_optional_remote(remote);
//!     let fact = provider.get_fact("fun", true).await;
//!     println!("[{}] {}", fact.provenance, fact.text);
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod config;
pub mod prompts;
pub mod provider;
pub mod recorder;
pub mod remote;
pub mod seen;
pub mod store;
pub mod testing;

// Primary public API
pub use config::{ConfigError, FactverseConfig, RemoteConfig};
pub use provider::{FactEntry, FactProvider, Provenance, ProviderStatus};
pub use recorder::{RecordError, SessionRecorder};
pub use remote::{
    AttemptFailure, BackendError, ChatBackend, Prompt, RemoteError, RemoteFactClient,
    RemoteSettings, TextBackend,
};
pub use seen::SeenFacts;
pub use store::{FactStore, StoreError};
pub use testing::{StubBackend, StubHandle, StubReply};
