//! Session-scoped record of facts already handed out.

use std::collections::HashSet;

/// Normalized facts returned during one session.
///
/// Membership is checked on the trimmed, lower-cased form so that the same
/// sentence with different capitalization or padding counts as a repeat.
#[derive(Debug, Default, Clone)]
pub struct SeenFacts {
    facts: HashSet<String>,
}

impl SeenFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key a fact is stored under.
    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.facts.contains(&Self::normalize(text))
    }

    /// Record a fact. Returns false if it was already present.
    pub fn insert(&mut self, text: &str) -> bool {
        self.facts.insert(Self::normalize(text))
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn clear(&mut self) {
        self.facts.clear();
    }
}
