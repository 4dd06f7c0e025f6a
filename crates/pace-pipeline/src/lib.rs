//! Paced Byte Pipeline
//!
//! The producer reads input on the calling thread and pushes it into a
//! shared [`RingBuffer`]. A drain thread spends timer credits, one byte per
//! credit, writing queued bytes to the output sink. The two sides share
//! nothing but the buffer lock and a set-once [`StatusCell`].

mod drain;
mod error;
mod pipeline;
mod status;

pub use error::PipelineError;
pub use pipeline::{Completion, Pipeline, PipelineConfig, DEFAULT_READ_CHUNK};
pub use status::{RunStatus, StatusCell};

pub use byte_queue::{RingBuffer, DEFAULT_CAPACITY};
pub use pace_timer::{PacingConfig, TickSource, TimerKind};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock the shared queue; a panicked holder cannot leave it half-updated
pub(crate) fn lock(queue: &Mutex<RingBuffer>) -> MutexGuard<'_, RingBuffer> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}
