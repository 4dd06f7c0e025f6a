//! Portable deadline timer
//!
//! Credits are derived from the time elapsed since the first deadline, so an
//! oversleeping thread or a slow consumer never loses ticks: the next `wait`
//! simply reports more of them.

use crate::{PacingConfig, TickSource};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// Sleep-until-deadline tick source over the monotonic clock
#[derive(Debug)]
pub struct DeadlineTimer {
    /// Instant of the first tick
    first: Instant,
    /// Tick interval in nanoseconds
    interval_nanos: u64,
    /// Ticks already handed out
    delivered: u64,
}

impl DeadlineTimer {
    /// Arm the timer; the first tick is due after the configured offset
    pub fn start(config: &PacingConfig) -> io::Result<Self> {
        Self::start_at(Instant::now(), config)
    }

    fn start_at(origin: Instant, config: &PacingConfig) -> io::Result<Self> {
        let first = origin
            .checked_add(config.first_deadline_offset())
            .ok_or_else(overflow)?;
        Ok(Self {
            first,
            interval_nanos: u64::from(config.nanos_per_byte()),
            delivered: 0,
        })
    }

    /// Number of ticks due at `now`, counting the first one
    fn due_at(&self, now: Instant) -> io::Result<u64> {
        let Some(since) = now.checked_duration_since(self.first) else {
            return Ok(0);
        };
        let due = since.as_nanos() / u128::from(self.interval_nanos) + 1;
        u64::try_from(due).map_err(|_| overflow())
    }

    /// Instant at which tick number `index` (zero-based) falls due
    fn deadline(&self, index: u64) -> io::Result<Instant> {
        let offset = self
            .interval_nanos
            .checked_mul(index)
            .map(Duration::from_nanos)
            .ok_or_else(overflow)?;
        self.first.checked_add(offset).ok_or_else(overflow)
    }
}

impl TickSource for DeadlineTimer {
    fn wait(&mut self) -> io::Result<u64> {
        loop {
            let now = Instant::now();
            let due = self.due_at(now)?;
            if due > self.delivered {
                let credits = due - self.delivered;
                self.delivered = due;
                return Ok(credits);
            }
            let next = self.deadline(self.delivered)?;
            thread::sleep(next.saturating_duration_since(now));
        }
    }
}

fn overflow() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "timer deadline overflow")
}
