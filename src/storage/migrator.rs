//! One-time relocation of the notes database into the shared container.
//!
//! To share data with widget and extension processes, the embedded SQLite
//! database moves from its process-private location to a shared directory.
//! The move is a copy: the legacy store is kept as a fallback and never
//! deleted. Must run before the long-lived store connection is opened.
//!
//! Whether work remains is decided purely from filesystem state
//! (`legacy exists && !shared exists`), re-derived on every call; there is
//! no persisted "migrated" flag. Two processes racing to migrate the same
//! destination are resolved by the create-new publish step: exactly one
//! wins, the loser observes [`NwError::DestinationConflict`] and keeps
//! using its legacy store.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::diagnostics::{ErrorReporter, TracingReporter};
use crate::error::{NwError, Result};
use crate::settings::{companion_path, StorageSettings, COMPANION_SUFFIXES};
use crate::storage::schema::SchemaModel;

/// Performs the guarded legacy-to-shared database relocation.
pub struct SharedStorageMigrator {
    settings: StorageSettings,
    reporter: Box<dyn ErrorReporter>,
}

impl std::fmt::Debug for SharedStorageMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorageMigrator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SharedStorageMigrator {
    /// Create a migrator reporting failures via `tracing`.
    #[must_use]
    pub fn new(settings: StorageSettings) -> Self {
        Self::with_reporter(settings, Box::new(TracingReporter))
    }

    /// Create a migrator with an explicit diagnostics sink.
    #[must_use]
    pub fn with_reporter(settings: StorageSettings, reporter: Box<dyn ErrorReporter>) -> Self {
        Self { settings, reporter }
    }

    /// The location pair this migrator operates on.
    #[must_use]
    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    /// Whether migration work remains: the legacy store exists and the
    /// shared store does not. Evaluated against live filesystem state.
    #[must_use]
    pub fn migration_needed(&self) -> bool {
        self.settings.legacy_storage_exists() && !self.settings.shared_storage_exists()
    }

    /// Run the migration if needed. Never propagates an error: failures
    /// are logged, forwarded to the diagnostics sink, and swallowed so the
    /// caller's startup sequence always continues. The legacy store stays
    /// usable either way; a failed run is retried on the next launch.
    pub fn perform_migration_if_needed(&self) {
        if !self.migration_needed() {
            debug!("database migration not required");
            return;
        }

        info!("beginning database migration to shared container");
        match self.migrate() {
            Ok(()) => info!("database migration successful"),
            Err(err) => {
                warn!("could not migrate database to shared container: {err}");
                self.reporter.report(&err);
            }
        }
    }

    /// The relocation itself: checkpoint, then copy. Does not re-check the
    /// idempotency predicate; the copy step still refuses an existing
    /// destination.
    pub fn migrate(&self) -> Result<()> {
        self.checkpoint_legacy_store()?;
        self.copy_store_files()?;
        Ok(())
    }

    /// Merge the legacy store's WAL/journal side files into the main
    /// database file so a plain file copy is self-consistent.
    ///
    /// Opens a throwaway connection for the duration of one pragma and
    /// discards it. If the schema definition cannot be loaded the
    /// checkpoint is skipped and the copy proceeds against the store
    /// as-is.
    fn checkpoint_legacy_store(&self) -> Result<()> {
        let schema = match SchemaModel::load(self.settings.schema()) {
            Ok(schema) => schema,
            Err(err) => {
                debug!("skipping checkpoint, schema definition unavailable: {err}");
                return Ok(());
            }
        };

        let conn = Connection::open(self.settings.legacy_db())?;
        schema.apply(&conn)?;

        // Leaving WAL mode forces a full checkpoint and removes the side
        // files.
        let mode: String =
            conn.query_row("PRAGMA journal_mode = DELETE;", [], |row| row.get(0))?;
        if !mode.eq_ignore_ascii_case("delete") {
            return Err(NwError::Config(format!(
                "legacy store refused journal mode change: {mode}"
            )));
        }
        Ok(())
    }

    /// Copy the main database file and any surviving side files to the
    /// shared location, all-or-nothing.
    ///
    /// Everything is first copied under staging names in the destination
    /// directory, then published with create-new link semantics: side
    /// files first, the main database file last. The main file is the
    /// commit point — `migration_needed` flips on its presence — so it
    /// must never appear before everything else is in place. A failure at
    /// any point removes the staging files and unlinks any side file
    /// already published, so no readable-but-incomplete copy is ever
    /// visible at the shared path, and a racing second migrator loses
    /// without touching the winner's files.
    fn copy_store_files(&self) -> Result<()> {
        let legacy = self.settings.legacy_db();
        let shared = self.settings.shared_db();

        if shared.exists() {
            return Err(NwError::DestinationConflict(shared.to_path_buf()));
        }
        if let Some(parent) = shared.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging_suffix = format!(".migrating-{}", std::process::id());

        // (staging, destination) pairs, main database last.
        let mut pending: Vec<(PathBuf, PathBuf)> = Vec::new();
        for suffix in COMPANION_SUFFIXES {
            let source = companion_path(legacy, suffix);
            if !source.exists() {
                continue;
            }
            let destination = companion_path(shared, suffix);
            let staging = companion_path(&destination, &staging_suffix);
            if let Err(err) = fs::copy(&source, &staging) {
                remove_files(pending.iter().map(|(staging, _)| staging));
                return Err(err.into());
            }
            pending.push((staging, destination));
        }

        let stage_main = companion_path(shared, &staging_suffix);
        if let Err(err) = fs::copy(legacy, &stage_main) {
            remove_files(pending.iter().map(|(staging, _)| staging));
            return Err(err.into());
        }
        pending.push((stage_main, shared.to_path_buf()));

        // hard_link fails if the destination appeared in the meantime; an
        // existing path at any destination means another migrator (or its
        // leftovers) got there first.
        let mut published: Vec<&PathBuf> = Vec::new();
        for (staging, destination) in &pending {
            if let Err(err) = fs::hard_link(staging, destination) {
                remove_files(published.into_iter());
                remove_files(pending.iter().map(|(staging, _)| staging));
                if err.kind() == std::io::ErrorKind::AlreadyExists {
                    return Err(NwError::DestinationConflict(shared.to_path_buf()));
                }
                return Err(err.into());
            }
            published.push(destination);
        }

        for (staging, _) in &pending {
            if let Err(err) = fs::remove_file(staging) {
                warn!("could not remove staging file {}: {err}", staging.display());
            }
        }
        Ok(())
    }
}

fn remove_files<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

/// True when the path names an openable SQLite database file.
pub fn store_is_openable(path: &Path) -> bool {
    Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
        .and_then(|conn| {
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
        })
        .is_ok()
}
