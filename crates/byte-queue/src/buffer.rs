//! Byte Ring Buffer Implementation

use crate::QueueError;

/// Default buffer capacity (64 KiB, about 5.7 s of 115200 baud traffic)
pub const DEFAULT_CAPACITY: usize = 65536;

/// Fixed-capacity byte queue with wrap-around storage
///
/// The valid region is the `count` bytes starting at `oldest`, modulo the
/// capacity. The queue is not internally synchronized; share it behind a lock.
#[derive(Debug)]
pub struct RingBuffer {
    /// Pre-allocated storage
    storage: Box<[u8]>,
    /// Index of the next byte to be consumed
    oldest: usize,
    /// Number of valid bytes held
    count: usize,
    /// Total bytes accepted by `put` (for statistics)
    total_written: u64,
}

impl RingBuffer {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| QueueError::Allocation { capacity })?;
        storage.resize(capacity, 0u8);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            oldest: 0,
            count: 0,
            total_written: 0,
        })
    }

    /// Append `bytes` if they fit entirely in the free space.
    ///
    /// Returns `false` and leaves the queue untouched otherwise. A slice
    /// longer than the capacity can never be accepted.
    #[must_use]
    pub fn put(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.free() {
            return false;
        }

        let capacity = self.capacity();
        let start = (self.oldest + self.count) % capacity;
        let head = bytes.len().min(capacity - start);

        self.storage[start..start + head].copy_from_slice(&bytes[..head]);
        self.storage[..bytes.len() - head].copy_from_slice(&bytes[head..]);

        self.count += bytes.len();
        self.total_written += bytes.len() as u64;
        true
    }

    /// Longest contiguous run of queued bytes starting at the oldest byte.
    ///
    /// Shorter than [`len`](Self::len) when the valid region wraps past the
    /// end of the storage. `None` when the queue is empty.
    pub fn peek_run(&self) -> Option<&[u8]> {
        if self.count == 0 {
            return None;
        }
        let len = (self.capacity() - self.oldest).min(self.count);
        Some(&self.storage[self.oldest..self.oldest + len])
    }

    /// Remove `n` bytes from the front; `n >= len()` empties the queue
    pub fn consume(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        if n >= self.count {
            self.count = 0;
            self.oldest = 0;
            return;
        }
        self.count -= n;
        self.oldest = (self.oldest + n) % self.capacity();
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.consume(self.count);
    }

    /// Get the number of bytes currently queued
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Free space in bytes
    pub fn free(&self) -> usize {
        self.capacity() - self.count
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Get total bytes written (for statistics)
    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}
