//! Pipeline Error Types

use crate::RunStatus;
use byte_queue::QueueError;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors that end a pacing run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ring buffer could not be created
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Tick source could not be created or armed
    #[error("Can't start timer: {0}")]
    TimerStart(io::Error),

    /// Drain thread could not be spawned
    #[error("Can't start drain thread: {0}")]
    Spawn(io::Error),

    /// Pacing outran the input before end of input
    #[error("Dequeue underflow")]
    Underflow,

    /// Tick source read failed
    #[error("Timer read failed: {0}")]
    Timer(Arc<io::Error>),

    /// Output write failed or was short
    #[error("Output write failed: {0}")]
    Write(Arc<io::Error>),

    /// Input read failed
    #[error("Input read failed: {0}")]
    Read(Arc<io::Error>),
}

impl PipelineError {
    /// Error for a terminal status; `None` while still running
    pub fn from_status(status: RunStatus) -> Option<Self> {
        match status {
            RunStatus::Running => None,
            RunStatus::Underflow => Some(PipelineError::Underflow),
            RunStatus::TimerError(err) => Some(PipelineError::Timer(err)),
            RunStatus::WriteError(err) => Some(PipelineError::Write(err)),
            RunStatus::ReadError(err) => Some(PipelineError::Read(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(PipelineError::from_status(RunStatus::Running).is_none());
        assert!(matches!(
            PipelineError::from_status(RunStatus::Underflow),
            Some(PipelineError::Underflow)
        ));

        let err = Arc::new(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        let mapped = PipelineError::from_status(RunStatus::WriteError(err)).unwrap();
        assert_eq!(mapped.to_string(), "Output write failed: pipe closed");
    }
}
