//! Pacing Error Types

use thiserror::Error;

/// Errors while resolving a pacing configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaceError {
    /// Baud rate outside (10, 1000000]
    #[error("Invalid baud rate {0} (must be 11 to 1000000)")]
    InvalidBaud(u32),

    /// Interval outside [1, 999999999] nanoseconds
    #[error("Invalid pace {0}nS (must be 1 to 999999999)")]
    InvalidNanos(u32),

    /// Unrecognized tick source name
    #[error("Unknown timer '{0}' (expected 'deadline' or 'timerfd')")]
    UnknownTimer(String),
}
