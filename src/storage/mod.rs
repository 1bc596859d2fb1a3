//! Storage layer for notewidget
//!
//! One-time shared-container migration plus the SQLite wrapper both the
//! app and the widget query layer open.

pub mod migrator;
pub mod schema;
pub mod sqlite;

pub use migrator::SharedStorageMigrator;
pub use schema::SchemaModel;
pub use sqlite::{Database, NoteRecord};
