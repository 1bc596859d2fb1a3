//! Diagnostics sink for migration failures.
//!
//! The migrator forwards unrecoverable errors to an [`ErrorReporter`]
//! instead of propagating them; the sink has no return contract and must
//! not panic.

use crate::error::NwError;

/// Fire-and-forget error sink.
pub trait ErrorReporter {
    /// Record one error. Implementations must not panic.
    fn report(&self, err: &NwError);
}

/// Default reporter: emits a `tracing` error event.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, err: &NwError) {
        tracing::error!("storage migration failed: {err}");
    }
}

/// Test reporter that collects error messages.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reported: std::sync::Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.reported.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Number of reports received.
    pub fn count(&self) -> usize {
        self.reported.lock().map(|m| m.len()).unwrap_or(0)
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, err: &NwError) {
        if let Ok(mut reported) = self.reported.lock() {
            reported.push(err.to_string());
        }
    }
}
