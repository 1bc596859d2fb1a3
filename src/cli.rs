//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::error::{NwError, Result};
use crate::storage::migrator::SharedStorageMigrator;
use crate::widget::{SortMode, TagFilter, WidgetDataController};

/// notewidget - shared-storage migration and widget data for a notes app
#[derive(Parser, Debug)]
#[command(name = "notewidget")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/notewidget/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relocate the notes database into the shared container if needed
    Migrate {
        /// Attempt the relocation even when the idempotency check says it
        /// is not needed; surfaces the error instead of swallowing it
        #[arg(long)]
        force: bool,
    },
    /// List notes from the authoritative store
    List {
        /// Only notes carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Result-count ceiling (0 = unlimited)
        #[arg(long)]
        limit: Option<usize>,

        /// Sort order (defaults to the configured mode)
        #[arg(long, value_enum)]
        sort: Option<SortMode>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show a single note by key
    Show {
        /// Note key
        key: String,
    },
    /// List all tags
    Tags,
}

/// Dispatch a parsed command.
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = config.storage_settings()?;

    match &cli.command {
        Commands::Migrate { force } => {
            let migrator = SharedStorageMigrator::new(settings);
            if *force {
                migrator.migrate()?;
                info!("database migration successful");
            } else {
                migrator.perform_migration_if_needed();
            }
            Ok(())
        }
        Commands::List {
            tag,
            limit,
            sort,
            json,
        } => {
            let sort_mode = (*sort).unwrap_or(config.widget.sort_mode);
            let controller = WidgetDataController::open(&settings, sort_mode)?;

            let filter = tag
                .as_deref()
                .map_or(TagFilter::AllNotes, TagFilter::from_identifier);
            let limit = (*limit).unwrap_or(config.widget.default_limit);
            let notes = controller.notes(&filter, limit)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else {
                for note in &notes {
                    println!("{}\t{}", note.key, first_line(&note.content));
                }
            }
            Ok(())
        }
        Commands::Show { key } => {
            let controller = WidgetDataController::open(&settings, config.widget.sort_mode)?;
            let note = controller
                .note_for_key(key)?
                .ok_or_else(|| NwError::NotFound(format!("note {key}")))?;
            println!("{}", note.content);
            Ok(())
        }
        Commands::Tags => {
            let controller = WidgetDataController::open(&settings, config.widget.sort_mode)?;
            for tag in controller.tags()? {
                println!("{tag}");
            }
            Ok(())
        }
    }
}

fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["notewidget", "migrate", "--force"]);
        assert!(matches!(cli.command, Commands::Migrate { force: true }));

        let cli = Cli::parse_from(["notewidget", "list", "--tag", "work", "--limit", "5"]);
        match cli.command {
            Commands::List { tag, limit, .. } => {
                assert_eq!(tag.as_deref(), Some("work"));
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn first_line_truncates_multiline_content() {
        assert_eq!(first_line("Title\nbody"), "Title");
        assert_eq!(first_line(""), "");
    }
}
