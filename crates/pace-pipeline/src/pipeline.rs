//! Pipeline setup and the producer fill loop

use crate::drain::Drain;
use crate::{lock, PipelineError, RunStatus, StatusCell};
use byte_queue::{RingBuffer, DEFAULT_CAPACITY};
use pace_timer::{PacingConfig, TickSource};
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default size of a single input read
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Output pace
    pub pacing: PacingConfig,
    /// Ring buffer capacity in bytes
    pub capacity: usize,
    /// Largest single input read, clamped to the capacity
    pub read_chunk: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            capacity: DEFAULT_CAPACITY,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

/// Successful end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Input was empty; nothing was paced
    Empty,
    /// All input was emitted
    Drained { bytes: u64 },
}

/// How the fill loop ended
#[derive(Debug)]
enum FillEnd {
    /// Input returned end of file
    EndOfInput,
    /// A terminal status was observed
    Stopped,
    /// Reading the input failed (already published)
    ReadFailed(Arc<io::Error>),
}

/// Producer half of the pipeline
struct Fill<'a, R> {
    input: R,
    queue: &'a Mutex<RingBuffer>,
    status: &'a StatusCell,
    chunk: Vec<u8>,
    /// Sleep between attempts while the queue is full
    backoff: Duration,
}

impl<R: Read> Fill<'_, R> {
    fn run(mut self) -> FillEnd {
        // Pending input is chunk[start..end]
        let (mut start, mut end) = (0usize, 0usize);
        loop {
            if self.status.is_terminal() {
                return FillEnd::Stopped;
            }

            if start == end {
                match read_some(&mut self.input, &mut self.chunk) {
                    Ok(0) => return FillEnd::EndOfInput,
                    Ok(n) => (start, end) = (0, n),
                    Err(err) => {
                        let err = Arc::new(err);
                        self.status.publish(RunStatus::ReadError(Arc::clone(&err)));
                        return FillEnd::ReadFailed(err);
                    }
                }
                continue;
            }

            let pushed = {
                let mut queue = lock(self.queue);
                let n = queue.free().min(end - start);
                if n > 0 && queue.put(&self.chunk[start..start + n]) {
                    n
                } else {
                    0
                }
            };

            if pushed > 0 {
                start += pushed;
            } else {
                // Full: at most one byte frees up per interval
                thread::yield_now();
                thread::sleep(self.backoff);
            }
        }
    }
}

/// Paced byte pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Copy `input` to `output` at the configured pace.
    ///
    /// The first read happens before `start_timer` is called; empty input
    /// returns [`Completion::Empty`] without arming a timer. Underflow after
    /// end of input is the normal way a run finishes and is reported as
    /// success.
    pub fn run<R, W, T, F>(&self, mut input: R, output: W, start_timer: F) -> Result<Completion, PipelineError>
    where
        R: Read,
        W: Write + Send,
        T: TickSource,
        F: FnOnce(&PacingConfig) -> io::Result<T>,
    {
        let mut queue = RingBuffer::new(self.config.capacity)?;
        let chunk_len = self.config.read_chunk.clamp(1, queue.capacity());
        let mut chunk = vec![0u8; chunk_len];

        let primed = read_some(&mut input, &mut chunk).map_err(|err| PipelineError::Read(Arc::new(err)))?;
        if primed == 0 {
            info!("Nothing to read");
            return Ok(Completion::Empty);
        }
        let accepted = queue.put(&chunk[..primed]);
        debug_assert!(accepted, "primed chunk is clamped to capacity");
        debug!("Primed queue with {} bytes", primed);

        let ticks = start_timer(&self.config.pacing).map_err(PipelineError::TimerStart)?;
        let queue = Mutex::new(queue);
        let status = StatusCell::new();
        let started = Instant::now();

        info!(
            "Pacing at {}nS per byte, {} byte queue",
            self.config.pacing.nanos_per_byte(),
            self.config.capacity
        );

        let (end, emitted) = thread::scope(|scope| {
            let drain = Drain::new(&queue, &status, ticks, output);
            let handle = thread::Builder::new()
                .name("pace-drain".to_string())
                .spawn_scoped(scope, move || drain.run())
                .map_err(PipelineError::Spawn)?;

            let fill = Fill {
                input,
                queue: &queue,
                status: &status,
                chunk,
                backoff: self.config.pacing.interval(),
            };
            let end = fill.run();

            // Every fill outcome waits for the drain thread to settle
            let emitted = handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            Ok::<_, PipelineError>((end, emitted))
        })?;

        let total_written = lock(&queue).total_written();
        debug!(
            "Run ended after {:?}: {} of {} queued bytes emitted",
            started.elapsed(),
            emitted,
            total_written
        );

        match end {
            FillEnd::EndOfInput => match status.get() {
                // Expected: the drain ran dry after the last byte
                RunStatus::Running | RunStatus::Underflow => {
                    info!("Paced {} bytes", emitted);
                    Ok(Completion::Drained { bytes: emitted })
                }
                other => Err(PipelineError::from_status(other).unwrap_or(PipelineError::Underflow)),
            },
            FillEnd::Stopped => Err(PipelineError::from_status(status.get()).unwrap_or(PipelineError::Underflow)),
            FillEnd::ReadFailed(err) => Err(PipelineError::Read(err)),
        }
    }
}

/// Single read, retried on `Interrupted`
fn read_some<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match input.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}
