//! The built-in fact categories.
//!
//! Categories are plain strings everywhere else in the crate; this catalog
//! only adds the menu numbering and display labels used by front ends.

/// A known category with its menu key and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Identifier used as the key in fact tables and prompts.
    pub key: &'static str,
    /// Menu choice that selects this category.
    pub menu_key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

pub static CATEGORIES: [CategoryInfo; 5] = [
    CategoryInfo {
        key: "hacking",
        menu_key: "1",
        label: "🧠 Hacking Intel",
    },
    CategoryInfo {
        key: "fun",
        menu_key: "2",
        label: "🎭 Fun Bytes",
    },
    CategoryInfo {
        key: "attitude",
        menu_key: "3",
        label: "😎 Attitude Logs",
    },
    CategoryInfo {
        key: "lazy",
        menu_key: "4",
        label: "💤 Lazy Logs",
    },
    CategoryInfo {
        key: "motivation",
        menu_key: "5",
        label: "🚀 Motivation Doses",
    },
];

/// Look up a category by its key (case-insensitive).
pub fn lookup(key: &str) -> Option<&'static CategoryInfo> {
    let key = key.trim();
    CATEGORIES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

/// Look up a category by menu choice.
pub fn by_menu_key(choice: &str) -> Option<&'static CategoryInfo> {
    let choice = choice.trim();
    CATEGORIES.iter().find(|c| c.menu_key == choice)
}

/// Display label for a category, or the raw key for unknown categories.
pub fn display_name(key: &str) -> &str {
    lookup(key).map(|c| c.label).unwrap_or(key)
}
