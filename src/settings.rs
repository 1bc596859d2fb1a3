//! Storage location settings.
//!
//! A [`StorageSettings`] names the three paths the migration and query
//! layers care about: the legacy (process-private) database, the shared
//! (cross-process) database, and the schema definition used to open the
//! store. Existence predicates are evaluated against the live filesystem on
//! every call; nothing here is cached.

use std::path::{Path, PathBuf};

/// SQLite side-file suffixes that may accompany a database file.
pub const COMPANION_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Paths for the legacy and shared database locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    legacy_db: PathBuf,
    shared_db: PathBuf,
    schema: PathBuf,
}

impl StorageSettings {
    /// Create settings from explicit paths.
    pub fn new(
        legacy_db: impl Into<PathBuf>,
        shared_db: impl Into<PathBuf>,
        schema: impl Into<PathBuf>,
    ) -> Self {
        Self {
            legacy_db: legacy_db.into(),
            shared_db: shared_db.into(),
            schema: schema.into(),
        }
    }

    /// Default locations under the platform data directory.
    ///
    /// Layout: `<data_dir>/notewidget/notes.db` for the legacy store and
    /// `<data_dir>/notewidget/shared/notes.db` for the shared container,
    /// with the schema definition alongside the legacy store. The
    /// `NW_DATA_DIR` environment variable relocates the root.
    pub fn resolve_default() -> Option<Self> {
        let root = match std::env::var_os("NW_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()?.join("notewidget"),
        };
        Some(Self {
            legacy_db: root.join("notes.db"),
            shared_db: root.join("shared").join("notes.db"),
            schema: root.join("notes.sql"),
        })
    }

    /// Path of the legacy (process-private) database.
    #[must_use]
    pub fn legacy_db(&self) -> &Path {
        &self.legacy_db
    }

    /// Path of the shared (cross-process) database.
    #[must_use]
    pub fn shared_db(&self) -> &Path {
        &self.shared_db
    }

    /// Path of the schema definition.
    #[must_use]
    pub fn schema(&self) -> &Path {
        &self.schema
    }

    /// Whether the legacy database currently exists.
    #[must_use]
    pub fn legacy_storage_exists(&self) -> bool {
        self.legacy_db.exists()
    }

    /// Whether the shared database currently exists.
    #[must_use]
    pub fn shared_storage_exists(&self) -> bool {
        self.shared_db.exists()
    }

    /// The authoritative database path: shared once it exists, legacy
    /// otherwise.
    #[must_use]
    pub fn active_db_path(&self) -> &Path {
        if self.shared_storage_exists() {
            &self.shared_db
        } else {
            &self.legacy_db
        }
    }

    /// Side files (`-wal`, `-shm`, `-journal`) that currently exist next to
    /// the given database file.
    #[must_use]
    pub fn existing_companions(base: &Path) -> Vec<PathBuf> {
        COMPANION_SUFFIXES
            .iter()
            .map(|suffix| companion_path(base, suffix))
            .filter(|path| path.exists())
            .collect()
    }
}

/// Append a SQLite side-file suffix to a database path.
#[must_use]
pub fn companion_path(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings_in(dir: &Path) -> StorageSettings {
        StorageSettings::new(
            dir.join("notes.db"),
            dir.join("shared/notes.db"),
            dir.join("notes.sql"),
        )
    }

    #[test]
    fn companion_path_appends_suffix() {
        let path = companion_path(Path::new("/data/notes.db"), "-wal");
        assert_eq!(path, PathBuf::from("/data/notes.db-wal"));
    }

    #[test]
    fn existence_checks_reflect_live_state() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path());

        assert!(!settings.legacy_storage_exists());
        assert!(!settings.shared_storage_exists());

        fs::write(settings.legacy_db(), b"db").unwrap();
        assert!(settings.legacy_storage_exists());

        fs::create_dir_all(settings.shared_db().parent().unwrap()).unwrap();
        fs::write(settings.shared_db(), b"db").unwrap();
        assert!(settings.shared_storage_exists());
    }

    #[test]
    fn active_path_prefers_shared_once_present() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path());

        assert_eq!(settings.active_db_path(), settings.legacy_db());

        fs::create_dir_all(settings.shared_db().parent().unwrap()).unwrap();
        fs::write(settings.shared_db(), b"db").unwrap();
        assert_eq!(settings.active_db_path(), settings.shared_db());
    }

    #[test]
    fn existing_companions_lists_only_present_files() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("notes.db");
        fs::write(&db, b"db").unwrap();
        fs::write(companion_path(&db, "-wal"), b"wal").unwrap();

        let companions = StorageSettings::existing_companions(&db);
        assert_eq!(companions, vec![companion_path(&db, "-wal")]);
    }
}
