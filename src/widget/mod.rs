//! Read-only query layer for widget surfaces.
//!
//! Thin glue over the notes store: filtered (tag-equals or not-deleted),
//! sorted, optionally limited note queries against whichever location is
//! authoritative after migration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{NwError, Result};
use crate::settings::StorageSettings;
use crate::storage::schema::SchemaModel;
use crate::storage::sqlite::{note_from_row, Database, NoteRecord};

/// Reserved tag identifier meaning "no tag filter".
pub const ALL_NOTES_IDENTIFIER: &str = "all-notes";

/// Note filter for widget queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// All notes that are not deleted.
    AllNotes,
    /// Notes carrying the given tag.
    Tag(String),
}

impl TagFilter {
    /// Map a tag identifier to a filter, honoring the reserved all-notes
    /// identifier.
    #[must_use]
    pub fn from_identifier(tag: &str) -> Self {
        if tag == ALL_NOTES_IDENTIFIER {
            Self::AllNotes
        } else {
            Self::Tag(tag.to_string())
        }
    }
}

/// User-configured ordering for widget note lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Most recently modified first.
    #[default]
    ModifiedNewest,
    /// Least recently modified first.
    ModifiedOldest,
    /// Most recently created first.
    CreatedNewest,
    /// Least recently created first.
    CreatedOldest,
    /// Content A to Z.
    Alphabetical,
    /// Content Z to A.
    AlphabeticalReversed,
}

impl SortMode {
    fn order_by(self) -> &'static str {
        match self {
            Self::ModifiedNewest => "modification_date DESC",
            Self::ModifiedOldest => "modification_date ASC",
            Self::CreatedNewest => "creation_date DESC",
            Self::CreatedOldest => "creation_date ASC",
            Self::Alphabetical => "content COLLATE NOCASE ASC",
            Self::AlphabeticalReversed => "content COLLATE NOCASE DESC",
        }
    }
}

/// Read-only access to the notes store for widget rendering.
#[derive(Debug)]
pub struct WidgetDataController {
    db: Database,
    sort_mode: SortMode,
}

impl WidgetDataController {
    /// Open the authoritative store location: shared once migration has
    /// happened, legacy otherwise.
    pub fn open(settings: &StorageSettings, sort_mode: SortMode) -> Result<Self> {
        if !settings.legacy_storage_exists() && !settings.shared_storage_exists() {
            return Err(NwError::Config(format!(
                "no notes store at {} or {}",
                settings.legacy_db().display(),
                settings.shared_db().display()
            )));
        }
        let db = Database::open(settings.active_db_path(), &SchemaModel::embedded())?;
        Ok(Self { db, sort_mode })
    }

    /// Wrap an already-open database.
    #[must_use]
    pub fn from_database(db: Database, sort_mode: SortMode) -> Self {
        Self { db, sort_mode }
    }

    /// Fetch notes matching the filter, in the configured order. A limit
    /// of zero fetches everything.
    pub fn notes(&self, filter: &TagFilter, limit: usize) -> Result<Vec<NoteRecord>> {
        let sql = format!(
            "SELECT key, content, creation_date, modification_date, deleted, pinned \
             FROM notes WHERE {} ORDER BY {} LIMIT ?",
            predicate(filter),
            self.sort_mode.order_by(),
        );
        let limit = if limit == 0 { -1 } else { limit as i64 };

        let mut stmt = self.db.conn().prepare(&sql)?;
        let mut results = Vec::new();
        match filter {
            TagFilter::AllNotes => {
                let rows = stmt.query_map([limit], note_from_row)?;
                for row in rows {
                    results.push(row?);
                }
            }
            TagFilter::Tag(tag) => {
                let rows = stmt.query_map(rusqlite::params![tag, limit], note_from_row)?;
                for row in rows {
                    results.push(row?);
                }
            }
        }
        Ok(results)
    }

    /// Look up a single note by key.
    pub fn note_for_key(&self, key: &str) -> Result<Option<NoteRecord>> {
        self.db.get_note(key)
    }

    /// The first note in the configured order.
    pub fn first_note(&self) -> Result<Option<NoteRecord>> {
        Ok(self.notes(&TagFilter::AllNotes, 1)?.into_iter().next())
    }

    /// All tag names, sorted.
    pub fn tags(&self) -> Result<Vec<String>> {
        self.db.tag_names()
    }
}

fn predicate(filter: &TagFilter) -> &'static str {
    match filter {
        TagFilter::AllNotes => "deleted = 0",
        TagFilter::Tag(_) => "key IN (SELECT note_key FROM note_tags WHERE tag = ?)",
    }
}
