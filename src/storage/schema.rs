//! Schema definition loading.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{NwError, Result};

/// Default schema shipped with the crate.
const EMBEDDED_SCHEMA: &str = include_str!("../../schema/notes.sql");

/// The structural definition needed to open a notes store.
///
/// The migrator passes this through to the connection untouched; it does
/// not interpret or validate the SQL.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    sql: String,
}

impl SchemaModel {
    /// The embedded default schema.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            sql: EMBEDDED_SCHEMA.to_string(),
        }
    }

    /// Load a schema definition from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let sql = std::fs::read_to_string(path)
            .map_err(|err| NwError::Config(format!("read schema {}: {err}", path.display())))?;
        Ok(Self { sql })
    }

    /// Apply the definition to an open connection. The shipped definition
    /// is idempotent DDL, so applying it to an already-initialized store is
    /// a no-op.
    pub fn apply(&self, conn: &Connection) -> Result<()> {
        conn.execute_batch(&self.sql)?;
        Ok(())
    }

    /// Raw SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}
