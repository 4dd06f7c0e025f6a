//! Byte Ring Buffer
//!
//! Fixed-capacity byte queue shared between the pacing producer and the
//! drain thread. Reads hand out the longest contiguous run so a consumer can
//! emit several bytes with a single write even when the queue wraps.

mod buffer;
mod error;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
pub use error::QueueError;
