pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod settings;
pub mod storage;
pub mod widget;

pub use error::{NwError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
