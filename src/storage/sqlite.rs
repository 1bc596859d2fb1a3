//! SQLite database layer

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::storage::schema::SchemaModel;

/// SQLite database wrapper for the notes store.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NoteRecord {
    pub key: String,
    pub content: String,
    pub creation_date: String,
    pub modification_date: String,
    pub deleted: bool,
    pub pinned: bool,
}

impl NoteRecord {
    /// A fresh note with both timestamps set to now.
    #[must_use]
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            key: key.into(),
            content: content.into(),
            creation_date: now.clone(),
            modification_date: now,
            deleted: false,
            pinned: false,
        }
    }
}

impl Database {
    /// Open the database at the given path, applying the schema definition.
    pub fn open(path: impl AsRef<Path>, schema: &SchemaModel) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        schema.apply(&conn)?;

        Ok(Self { conn })
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get_note(&self, key: &str) -> Result<Option<NoteRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, content, creation_date, modification_date, deleted, pinned \
             FROM notes WHERE key = ?",
        )?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(note_from_row(row)?));
        }
        Ok(None)
    }

    pub fn upsert_note(&self, note: &NoteRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notes (key, content, creation_date, modification_date, deleted, pinned)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                content=excluded.content,
                modification_date=excluded.modification_date,
                deleted=excluded.deleted,
                pinned=excluded.pinned",
            params![
                note.key,
                note.content,
                note.creation_date,
                note.modification_date,
                i32::from(note.deleted),
                i32::from(note.pinned),
            ],
        )?;
        Ok(())
    }

    /// Flag a note as deleted without removing the row.
    pub fn mark_deleted(&self, key: &str) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE notes SET deleted = 1, modification_date = ? WHERE key = ?",
            params![Utc::now().to_rfc3339(), key],
        )?;
        Ok(count > 0)
    }

    /// Replace the tag set of a note.
    pub fn set_note_tags(&self, key: &str, tags: &[String]) -> Result<()> {
        self.conn
            .execute("DELETE FROM note_tags WHERE note_key = ?", [key])?;
        for tag in tags {
            self.conn
                .execute("INSERT OR IGNORE INTO tags (name) VALUES (?)", [tag])?;
            self.conn.execute(
                "INSERT OR IGNORE INTO note_tags (note_key, tag) VALUES (?, ?)",
                params![key, tag],
            )?;
        }
        Ok(())
    }

    /// Count all notes, deleted included.
    pub fn note_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// All tag names, sorted.
    pub fn tag_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }
}

pub(crate) fn note_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    Ok(NoteRecord {
        key: row.get(0)?,
        content: row.get(1)?,
        creation_date: row.get(2)?,
        modification_date: row.get(3)?,
        deleted: row.get::<_, i64>(4)? != 0,
        pinned: row.get::<_, i64>(5)? != 0,
    })
}
