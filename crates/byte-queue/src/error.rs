//! Queue Error Types

use thiserror::Error;

/// Errors raised while creating a ring buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Backing storage could not be reserved
    #[error("Can't allocate {capacity} byte queue")]
    Allocation { capacity: usize },

    /// A queue must hold at least one byte
    #[error("Queue capacity must be at least 1 byte")]
    ZeroCapacity,
}
