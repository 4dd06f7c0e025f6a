//! Drain thread
//!
//! Spends timer credits on queued bytes. The queue lock is held only while
//! copying the front run out and while consuming it afterwards, never across
//! a timer wait or an output write. Only this thread removes bytes, so the
//! copied front stays valid between the two lock sections.

use crate::{lock, RingBuffer, RunStatus, StatusCell};
use pace_timer::TickSource;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, trace};

/// Drain state machine
#[derive(Debug)]
enum DrainState {
    WaitingForCredit,
    Draining { credit: u64 },
    Terminated(RunStatus),
}

/// Consumer half of the pipeline
pub(crate) struct Drain<'a, T, W> {
    queue: &'a Mutex<RingBuffer>,
    status: &'a StatusCell,
    ticks: T,
    sink: W,
    /// Bytes copied out of the queue for the current write
    scratch: Vec<u8>,
    /// Total bytes written to the sink
    emitted: u64,
}

impl<'a, T: TickSource, W: Write> Drain<'a, T, W> {
    pub(crate) fn new(queue: &'a Mutex<RingBuffer>, status: &'a StatusCell, ticks: T, sink: W) -> Self {
        Self {
            queue,
            status,
            ticks,
            sink,
            scratch: Vec::new(),
            emitted: 0,
        }
    }

    /// Run until a terminal status; returns the number of bytes emitted
    pub(crate) fn run(mut self) -> u64 {
        debug!("Drain thread started");
        let mut state = DrainState::WaitingForCredit;
        loop {
            state = match state {
                DrainState::WaitingForCredit => self.wait_for_credit(),
                DrainState::Draining { credit } => self.drain(credit),
                DrainState::Terminated(reason) => {
                    if self.status.publish(reason.clone()) {
                        match reason {
                            RunStatus::Underflow => debug!("Drain hit underflow after {} bytes", self.emitted),
                            other => debug!("Drain stopped after {} bytes: {:?}", self.emitted, other),
                        }
                    }
                    return self.emitted;
                }
            };
        }
    }

    fn wait_for_credit(&mut self) -> DrainState {
        if self.status.is_terminal() {
            return DrainState::Terminated(self.status.get());
        }
        match self.ticks.wait() {
            Ok(0) => DrainState::WaitingForCredit,
            Ok(credit) => DrainState::Draining { credit },
            Err(err) => DrainState::Terminated(RunStatus::TimerError(Arc::new(err))),
        }
    }

    /// Emit one contiguous run of at most `credit` bytes
    fn drain(&mut self, credit: u64) -> DrainState {
        if self.status.is_terminal() {
            return DrainState::Terminated(self.status.get());
        }

        self.scratch.clear();
        {
            let queue = lock(self.queue);
            let Some(run) = queue.peek_run() else {
                return DrainState::Terminated(RunStatus::Underflow);
            };
            let len = run.len().min(usize::try_from(credit).unwrap_or(usize::MAX));
            self.scratch.extend_from_slice(&run[..len]);
        }

        if let Err(err) = self.emit() {
            return DrainState::Terminated(RunStatus::WriteError(Arc::new(err)));
        }

        let written = self.scratch.len();
        lock(self.queue).consume(written);
        self.emitted += written as u64;
        trace!("Drained {} bytes, {} credits left", written, credit - written as u64);

        thread::yield_now();

        match credit - written as u64 {
            0 => DrainState::WaitingForCredit,
            credit => DrainState::Draining { credit },
        }
    }

    /// Single write of the scratch run, then flush
    fn emit(&mut self) -> io::Result<()> {
        loop {
            match self.sink.write(&self.scratch) {
                Ok(n) if n == self.scratch.len() => break,
                Ok(n) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short write ({} of {} bytes)", n, self.scratch.len()),
                    ))
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        self.sink.flush()
    }
}
