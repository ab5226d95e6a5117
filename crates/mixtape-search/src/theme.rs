use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CSS property → value.
pub type StyleProps = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Background/foreground pair applied to themed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl Theme {
    /// Only the exact key `"dark"` selects the dark palette.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#fff",
                foreground: "#000",
            },
            Theme::Dark => Palette {
                background: "#1f1f1f",
                foreground: "#fff",
            },
        }
    }
}

/// Named visual elements a host can restyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleSlot {
    SearchBarContainer,
    SelectNetwork,
    SearchBar,
    SearchBarMatic,
    ClearButton,
    SuggestionsContainer,
    Suggestion,
    SuggestionLogo,
}

impl StyleSlot {
    /// Built-in class name of the slot's stylesheet rule.
    pub fn builtin_class(&self) -> &'static str {
        match self {
            StyleSlot::SearchBarContainer => "searchBarContainer",
            StyleSlot::SelectNetwork => "selectNetwork",
            StyleSlot::SearchBar => "searchBar",
            StyleSlot::SearchBarMatic => "searchBarMatic",
            StyleSlot::ClearButton => "clearButton",
            StyleSlot::SuggestionsContainer => "suggestionsContainer",
            StyleSlot::Suggestion => "suggestion",
            StyleSlot::SuggestionLogo => "suggestionLogo",
        }
    }

    /// Whether the theme palette applies to this slot.
    pub fn is_themed(&self) -> bool {
        matches!(
            self,
            StyleSlot::SearchBarContainer
                | StyleSlot::SearchBar
                | StyleSlot::SearchBarMatic
                | StyleSlot::SuggestionsContainer
                | StyleSlot::SuggestionLogo
        )
    }
}

/// Effective inline style for a slot: palette first, caller overrides win.
pub fn resolve_style(theme: Theme, slot: StyleSlot, overrides: Option<&StyleProps>) -> StyleProps {
    let mut style = StyleProps::new();
    if slot.is_themed() {
        let palette = theme.palette();
        style.insert("backgroundColor".to_string(), palette.background.to_string());
        style.insert("color".to_string(), palette.foreground.to_string());
    }
    if let Some(overrides) = overrides {
        style.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    style
}

/// Built-in class followed by the caller's extra classes, if any.
pub fn compose_class(slot: StyleSlot, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|e| !e.is_empty()) {
        Some(extra) => format!("{} {}", slot.builtin_class(), extra),
        None => slot.builtin_class().to_string(),
    }
}
