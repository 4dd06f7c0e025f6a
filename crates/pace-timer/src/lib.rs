//! Byte Pacing Timer
//!
//! Converts baud rates and explicit intervals into a [`PacingConfig`] and
//! provides periodic tick sources. A tick source never drops a tick: every
//! interval that elapsed since the previous read is returned as a credit.

mod config;
mod deadline;
mod error;
mod source;
#[cfg(target_os = "linux")]
mod timerfd;

pub use config::{PacingConfig, DEFAULT_BAUD, MAX_BAUD, MAX_NANOS_PER_BYTE, MIN_BAUD};
pub use deadline::DeadlineTimer;
pub use error::PaceError;
pub use source::{TickSource, TimerKind};
#[cfg(target_os = "linux")]
pub use timerfd::TimerFd;
