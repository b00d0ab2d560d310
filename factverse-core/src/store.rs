//! Local fact tables.
//!
//! A [`FactStore`] maps category names to candidate facts. It is loaded once
//! at startup and never mutated afterwards; unknown categories simply have
//! no facts.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading a fact table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error reading fact table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed fact table (expected an object of category -> list of strings): {0}")]
    Malformed(String),
}

/// Immutable mapping from category to candidate facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactStore {
    facts: BTreeMap<String, Vec<String>>,
}

impl FactStore {
    /// An empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a JSON fact table from disk.
    ///
    /// A missing file yields an empty store so that callers can still run
    /// with remote generation only.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match fs::read_to_string(path).await {
            Ok(content) => {
                let store = Self::from_json_str(&content)?;
                tracing::info!(
                    path = %path.display(),
                    categories = store.len(),
                    facts = store.total_facts(),
                    "loaded fact table"
                );
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "fact table not found, starting with no local facts");
                Ok(Self::empty())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Parse a JSON object of `category -> [fact, ...]`.
    pub fn from_json_str(content: &str) -> Result<Self, StoreError> {
        serde_json::from_str(content).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    /// Build a store from in-memory entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let facts = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
            .collect();
        Self { facts }
    }

    /// The compiled-in demo table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_FACTS.iter().map(|(k, v)| (*k, v.to_vec())))
    }

    /// Facts for a category; empty for unknown categories.
    pub fn facts(&self, category: &str) -> &[String] {
        self.facts.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        !self.facts(category).is_empty()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// True when there is not a single fact in any category.
    pub fn is_empty(&self) -> bool {
        self.total_facts() == 0
    }

    pub fn total_facts(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    /// Pick a uniformly random fact for a category.
    pub fn pick(&self, category: &str) -> Option<&str> {
        self.pick_with_rng(category, &mut rand::thread_rng())
    }

    /// Pick with a specific RNG (useful for testing).
    pub fn pick_with_rng<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<&str> {
        self.facts(category).choose(rng).map(String::as_str)
    }

    /// Pick uniformly among facts not rejected by `exclude`, falling back to
    /// the whole list once every fact is excluded.
    pub fn pick_preferring<R, F>(&self, category: &str, rng: &mut R, exclude: F) -> Option<&str>
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        let all = self.facts(category);
        let fresh: Vec<&String> = all.iter().filter(|f| !exclude(f.as_str())).collect();
        if fresh.is_empty() {
            all.choose(rng).map(String::as_str)
        } else {
            fresh.choose(rng).copied().map(String::as_str)
        }
    }
}

const BUILTIN_FACTS: &[(&str, &[&str])] = &[
    (
        "hacking",
        &[
            "Most black-hat hackers start learning before the age of 16.",
            "The term 'hacker' originally meant someone who was skilled at programming.",
            "White hat hackers help companies find security vulnerabilities legally.",
            "Social engineering is often more effective than technical attacks.",
            "Two-factor authentication can prevent 99.9% of automated attacks.",
        ],
    ),
    (
        "fun",
        &[
            "Honey never spoils - archaeologists have found edible honey in ancient Egyptian tombs.",
            "A group of flamingos is called a 'flamboyance'.",
            "Bananas are berries, but strawberries aren't.",
            "Octopuses have three hearts and blue blood.",
            "A jiffy is an actual unit of time - 1/100th of a second.",
        ],
    ),
    (
        "attitude",
        &[
            "Your attitude determines your altitude in life.",
            "Confidence is not 'they will like me', it's 'I'll be fine if they don't'.",
            "Don't let someone dim your light simply because it's shining in their eyes.",
            "Attitude is everything, so pick a good one.",
            "Life is 10% what happens to you and 90% how you react to it.",
        ],
    ),
    (
        "lazy",
        &[
            "I'm not lazy, I'm on energy saving mode.",
            "I choose a lazy person to do a hard job because they will find an easy way to do it.",
            "Hard work never killed anybody, but why take a chance?",
            "I put the 'Pro' in procrastination.",
            "I'm not lazy, I'm just highly motivated to do nothing.",
        ],
    ),
    (
        "motivation",
        &[
            "The only impossible journey is the one you never begin.",
            "Success is not final, failure is not fatal: it is the courage to continue that counts.",
            "Don't watch the clock; do what it does. Keep going.",
            "Believe you can and you're halfway there.",
            "The only way to do great work is to love what you do.",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_valid_table() {
        let store = FactStore::from_json_str(r#"{"fun": ["a", "b"], "lazy": []}"#).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.facts("fun"), ["a", "b"]);
        assert!(store.facts("lazy").is_empty());
        assert!(store.facts("space").is_empty());
    }

    #[test]
    fn test_malformed_tables_rejected() {
        for bad in [
            r#"["not", "a", "map"]"#,
            r#"{"fun": "not a list"}"#,
            r#"{"fun": [1, 2, 3]}"#,
            "not json at all",
        ] {
            assert!(
                matches!(FactStore::from_json_str(bad), Err(StoreError::Malformed(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_pick_never_none_for_populated_category() {
        let store = FactStore::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        for category in store.categories().collect::<Vec<_>>() {
            for _ in 0..25 {
                let fact = store.pick_with_rng(category, &mut rng).unwrap();
                assert!(store.facts(category).iter().any(|f| f == fact));
            }
        }
    }

    #[test]
    fn test_pick_none_for_empty_or_unknown() {
        let store = FactStore::from_json_str(r#"{"lazy": []}"#).unwrap();
        assert!(store.pick("lazy").is_none());
        assert!(store.pick("space").is_none());
        assert!(FactStore::empty().pick("fun").is_none());
    }

    #[test]
    fn test_seeded_picks_are_reproducible() {
        let store = FactStore::builtin();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let first: Vec<_> = (0..10).map(|_| store.pick_with_rng("fun", &mut a)).collect();
        let second: Vec<_> = (0..10).map(|_| store.pick_with_rng("fun", &mut b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_covers_whole_list() {
        let store = FactStore::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let picked: std::collections::HashSet<_> =
            (0..200).filter_map(|_| store.pick_with_rng("hacking", &mut rng)).collect();
        assert_eq!(picked.len(), store.facts("hacking").len());
    }

    #[test]
    fn test_pick_preferring_skips_excluded() {
        let store = FactStore::from_entries([("fun", vec!["old", "new"])]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(store.pick_preferring("fun", &mut rng, |f| f == "old"), Some("new"));
        }
        // Everything excluded: repeats are allowed again.
        assert!(store.pick_preferring("fun", &mut rng, |_| true).is_some());
    }

    #[test]
    fn test_builtin_table() {
        let store = FactStore::builtin();
        assert_eq!(store.len(), 5);
        assert_eq!(store.total_facts(), 25);
        for info in crate::category::CATEGORIES.iter() {
            assert!(store.contains(info.key));
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FactStore::load(dir.path().join("facts.json")).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, r#"{"fun": ["Bananas are berries."]}"#).unwrap();
        let store = FactStore::load(&path).await.unwrap();
        assert_eq!(store.pick("fun"), Some("Bananas are berries."));
    }

    #[tokio::test]
    async fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, r#"{"fun": {"nested": true}}"#).unwrap();
        assert!(matches!(
            FactStore::load(&path).await,
            Err(StoreError::Malformed(_))
        ));
    }
}
