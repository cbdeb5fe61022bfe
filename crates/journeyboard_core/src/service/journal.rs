//! Ideas journal use-cases.
//!
//! # Responsibility
//! - Validate, create, replace and delete journal entries.
//! - Filter entries by text query and category.
//!
//! # Invariants
//! - Rejected drafts change neither memory nor storage.
//! - Ids come from the injected generator and are never edited.
//! - Entry text is never written to logs.

use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::model::journal::{Category, JournalEntries, JournalEntry, DEFAULT_COLOR};
use crate::store::{KvStore, Persistence, RecordStore, Synced};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// Named field failed validation; nothing was stored.
    ValidationRejected(&'static str),
    EntryNotFound(String),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationRejected(field) => write!(f, "journal entry rejected: invalid {field}"),
            Self::EntryNotFound(id) => write!(f, "journal entry not found: {id}"),
        }
    }
}

impl Error for JournalError {}

/// User-editable part of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub color: String,
}

impl EntryDraft {
    /// Draft with default category (`idea`) and color.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: Category::default(),
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    fn validate(&self) -> Result<(), JournalError> {
        if self.title.trim().is_empty() {
            return Err(JournalError::ValidationRejected("title"));
        }
        if self.content.trim().is_empty() {
            return Err(JournalError::ValidationRejected("content"));
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(JournalError::ValidationRejected("color"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn accepts(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse::<Category>().map(Self::Only)
    }
}

/// Whether `entry` matches both the text query and the category filter.
pub fn entry_matches(entry: &JournalEntry, query: &str, category: CategoryFilter) -> bool {
    let needle = query.to_lowercase();
    let text_match = entry.title.to_lowercase().contains(&needle)
        || entry.content.to_lowercase().contains(&needle);
    text_match && category.accepts(entry.category)
}

/// Journal collection bound to its record store.
pub struct IdeasJournal<S> {
    store: RecordStore<S>,
    entries: JournalEntries,
    ids: Box<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    persistence: Persistence,
}

impl<S: KvStore> IdeasJournal<S> {
    /// Loads the journal, seeding an empty collection if absent.
    pub fn mount(store: RecordStore<S>, ids: Box<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        let synced = store.seed_if_absent(JournalEntries::default);
        info!(
            "event=journal_mount module=journal status=ok entries={}",
            synced.value.len()
        );
        Self {
            store,
            entries: synced.value,
            ids,
            clock,
            persistence: synced.persistence,
        }
    }

    pub fn entries(&self) -> &JournalEntries {
        &self.entries
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Creates a new entry at the front of the journal.
    ///
    /// The id and date (today, UTC wall clock) are assigned here.
    pub fn add(&mut self, draft: EntryDraft) -> Result<Synced<JournalEntry>, JournalError> {
        if let Err(err) = draft.validate() {
            debug!("event=journal_add module=journal status=rejected reason={err}");
            return Err(err);
        }

        let entry = JournalEntry {
            id: self.ids.next_id(),
            title: draft.title,
            content: draft.content,
            date: self.clock.now().date_naive(),
            category: draft.category,
            color: draft.color,
        };
        let persistence = self.apply(|entries| {
            let mut next = Vec::with_capacity(entries.len() + 1);
            next.push(entry.clone());
            next.extend(entries.entries().iter().cloned());
            JournalEntries(next)
        });
        info!(
            "event=journal_add module=journal status=ok id={} category={}",
            entry.id, entry.category
        );
        Ok(Synced {
            value: entry,
            persistence,
        })
    }

    /// Replaces the editable fields of entry `id`; `id` and `date` are kept.
    pub fn update(
        &mut self,
        id: &str,
        draft: EntryDraft,
    ) -> Result<Synced<JournalEntry>, JournalError> {
        draft.validate()?;
        let existing = self
            .entries
            .get(id)
            .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))?;

        let replacement = JournalEntry {
            id: existing.id.clone(),
            title: draft.title,
            content: draft.content,
            date: existing.date,
            category: draft.category,
            color: draft.color,
        };
        let persistence = self.apply(|entries| {
            JournalEntries(
                entries
                    .entries()
                    .iter()
                    .map(|entry| {
                        if entry.id == replacement.id {
                            replacement.clone()
                        } else {
                            entry.clone()
                        }
                    })
                    .collect(),
            )
        });
        info!("event=journal_update module=journal status=ok id={id}");
        Ok(Synced {
            value: replacement,
            persistence,
        })
    }

    /// Removes entry `id`. Missing ids are a no-op with no write.
    pub fn delete(&mut self, id: &str) -> Persistence {
        if self.entries.get(id).is_none() {
            return Persistence::Unchanged;
        }
        let persistence = self.apply(|entries| {
            JournalEntries(
                entries
                    .entries()
                    .iter()
                    .filter(|entry| entry.id != id)
                    .cloned()
                    .collect(),
            )
        });
        info!("event=journal_delete module=journal status=ok id={id}");
        persistence
    }

    /// Entries matching `query` (case-insensitive) AND `category`, newest first.
    pub fn filter(&self, query: &str, category: CategoryFilter) -> Vec<&JournalEntry> {
        self.entries
            .entries()
            .iter()
            .filter(|entry| entry_matches(entry, query, category))
            .collect()
    }

    fn apply(&mut self, transform: impl FnOnce(&JournalEntries) -> JournalEntries) -> Persistence {
        let synced = self.store.mutate(&self.entries, transform);
        self.entries = synced.value;
        self.persistence = synced.persistence.clone();
        synced.persistence
    }
}
