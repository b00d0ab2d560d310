//! Parsing of the shell's menu inputs.
//!
//! Everything here is pure so the shell's branching can be tested without a
//! terminal.

use factverse_core::category::{self, CategoryInfo, CATEGORIES};

/// A choice from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Category(&'static CategoryInfo),
    ToggleAi,
    Exit,
    Invalid,
}

/// A choice after a fact has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Another,
    ChangeCategory,
    Exit,
    Invalid,
}

/// Menu keys that follow the categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLayout {
    /// Whether the AI toggle entry is shown.
    pub show_toggle: bool,
}

impl MenuLayout {
    pub fn new(show_toggle: bool) -> Self {
        Self { show_toggle }
    }

    pub fn toggle_key(&self) -> Option<usize> {
        self.show_toggle.then_some(CATEGORIES.len() + 1)
    }

    pub fn exit_key(&self) -> usize {
        CATEGORIES.len() + if self.show_toggle { 2 } else { 1 }
    }

    /// Interpret a line typed at the main menu.
    pub fn parse(&self, input: &str) -> MenuChoice {
        let input = input.trim();
        if let Some(info) = category::by_menu_key(input) {
            return MenuChoice::Category(info);
        }

        match input.parse::<usize>() {
            Ok(n) if n == self.exit_key() => MenuChoice::Exit,
            Ok(n) if Some(n) == self.toggle_key() => MenuChoice::ToggleAi,
            _ => MenuChoice::Invalid,
        }
    }
}

pub fn parse_action(input: &str) -> Action {
    match input.trim() {
        "1" => Action::Another,
        "2" => Action::ChangeCategory,
        "3" => Action::Exit,
        _ => Action::Invalid,
    }
}

/// Answer to the `[Y/n]` save prompt. An empty answer means yes.
pub fn parse_save_answer(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_by_number() {
        let layout = MenuLayout::new(false);
        for info in &CATEGORIES {
            assert_eq!(layout.parse(info.menu_key), MenuChoice::Category(info));
        }
        assert_eq!(
            layout.parse(" 2 "),
            MenuChoice::Category(category::lookup("fun").unwrap())
        );
    }

    #[test]
    fn test_layout_without_toggle() {
        let layout = MenuLayout::new(false);
        assert_eq!(layout.toggle_key(), None);
        assert_eq!(layout.exit_key(), 6);
        assert_eq!(layout.parse("6"), MenuChoice::Exit);
        assert_eq!(layout.parse("7"), MenuChoice::Invalid);
    }

    #[test]
    fn test_layout_with_toggle() {
        let layout = MenuLayout::new(true);
        assert_eq!(layout.toggle_key(), Some(6));
        assert_eq!(layout.parse("6"), MenuChoice::ToggleAi);
        assert_eq!(layout.parse("7"), MenuChoice::Exit);
    }

    #[test]
    fn test_invalid_menu_input() {
        let layout = MenuLayout::new(true);
        for input in ["", "0", "8", "fun", "1.0", "-1"] {
            assert_eq!(layout.parse(input), MenuChoice::Invalid, "{input:?}");
        }
    }

    #[test]
    fn test_actions() {
        assert_eq!(parse_action("1"), Action::Another);
        assert_eq!(parse_action(" 2\n"), Action::ChangeCategory);
        assert_eq!(parse_action("3"), Action::Exit);
        assert_eq!(parse_action("4"), Action::Invalid);
        assert_eq!(parse_action(""), Action::Invalid);
    }

    #[test]
    fn test_save_answer() {
        for yes in ["", "y", "Y", "yes", "YES", "  y  "] {
            assert!(parse_save_answer(yes), "{yes:?}");
        }
        for no in ["n", "no", "nope", "x"] {
            assert!(!parse_save_answer(no), "{no:?}");
        }
    }
}
