//! Journal entries with category and color tags.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - Persisted entries have non-empty (trimmed) `title` and `content`.
//! - Collection order is newest first.

use super::JOURNAL_ENTRIES_KEY;
use crate::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_COLOR: &str = "#0abab5";

/// Selectable entry colors with their translation keys.
pub const COLOR_PALETTE: [(&str, &str); 5] = [
    ("#0abab5", "ideas.colors.tiffanyBlue"),
    ("#ff5555", "ideas.colors.red"),
    ("#f1fa8c", "ideas.colors.yellow"),
    ("#bd93f9", "ideas.colors.purple"),
    ("#50fa7b", "ideas.colors.green"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Idea,
    Goal,
    Quote,
    Reflection,
    Gratitude,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Idea,
        Self::Goal,
        Self::Quote,
        Self::Reflection,
        Self::Gratitude,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Goal => "goal",
            Self::Quote => "quote",
            Self::Reflection => "reflection",
            Self::Gratitude => "gratitude",
        }
    }

    pub fn label_key(self) -> String {
        format!("ideas.categories.{}", self.as_str())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown category `{value}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Creation date, `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub category: Category,
    /// `#rrggbb`.
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalEntries(pub Vec<JournalEntry>);

impl JournalEntries {
    pub fn entries(&self) -> &[JournalEntry] {
        &self.0
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.0.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Collection for JournalEntries {
    const KEY: &'static str = JOURNAL_ENTRIES_KEY;
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("todo".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Gratitude).unwrap(),
            "\"gratitude\""
        );
    }
}
