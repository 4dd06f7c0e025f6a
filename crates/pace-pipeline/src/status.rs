//! Shared terminal status

use std::io;
use std::sync::{Arc, OnceLock};

/// Pipeline state as observed by both threads
#[derive(Debug, Clone)]
pub enum RunStatus {
    /// No terminal condition yet
    Running,
    /// The drain thread had credit but the queue was empty
    Underflow,
    /// Reading the tick source failed
    TimerError(Arc<io::Error>),
    /// Writing to the output sink failed or came up short
    WriteError(Arc<io::Error>),
    /// Reading the input failed
    ReadError(Arc<io::Error>),
}

impl RunStatus {
    /// Anything other than `Running`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// Set-once cell holding the first terminal status
///
/// Once a terminal status is published it never changes; later publishes
/// are ignored.
#[derive(Debug, Default)]
pub struct StatusCell {
    terminal: OnceLock<RunStatus>,
}

impl StatusCell {
    /// Create a cell in the `Running` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status
    pub fn get(&self) -> RunStatus {
        self.terminal.get().cloned().unwrap_or(RunStatus::Running)
    }

    /// Whether a terminal status has been published
    pub fn is_terminal(&self) -> bool {
        self.terminal.get().is_some()
    }

    /// Publish a terminal status. Returns `true` if this call set it.
    pub fn publish(&self, status: RunStatus) -> bool {
        if !status.is_terminal() {
            return false;
        }
        self.terminal.set(status).is_ok()
    }
}
