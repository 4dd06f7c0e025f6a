//! Tick source abstraction

use crate::{DeadlineTimer, PaceError, PacingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing::debug;

/// A periodic alarm that reports elapsed intervals as credits
pub trait TickSource: Send {
    /// Block until at least one tick is due, then return the number of
    /// ticks that elapsed since the previous call. Ticks missed while the
    /// caller was busy are included, never dropped.
    fn wait(&mut self) -> io::Result<u64>;
}

impl<T: TickSource + ?Sized> TickSource for Box<T> {
    fn wait(&mut self) -> io::Result<u64> {
        (**self).wait()
    }
}

/// Available tick source backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    /// Sleep-until-deadline loop over the monotonic clock
    Deadline,
    /// Linux `timerfd` interval timer
    TimerFd,
}

impl TimerKind {
    /// Arm a tick source of this kind; the first tick is scheduled from now
    pub fn start(self, config: &PacingConfig) -> io::Result<Box<dyn TickSource>> {
        debug!("Starting {} timer at {}nS per byte", self, config.nanos_per_byte());
        match self {
            TimerKind::Deadline => Ok(Box::new(DeadlineTimer::start(config)?)),
            #[cfg(target_os = "linux")]
            TimerKind::TimerFd => Ok(Box::new(crate::TimerFd::start(config)?)),
            #[cfg(not(target_os = "linux"))]
            TimerKind::TimerFd => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "timerfd is only available on Linux",
            )),
        }
    }
}

impl Default for TimerKind {
    fn default() -> Self {
        if cfg!(target_os = "linux") {
            TimerKind::TimerFd
        } else {
            TimerKind::Deadline
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Deadline => f.write_str("deadline"),
            TimerKind::TimerFd => f.write_str("timerfd"),
        }
    }
}

impl FromStr for TimerKind {
    type Err = PaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deadline" => Ok(TimerKind::Deadline),
            "timerfd" => Ok(TimerKind::TimerFd),
            _ => Err(PaceError::UnknownTimer(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_kind_parse() {
        assert_eq!("deadline".parse::<TimerKind>(), Ok(TimerKind::Deadline));
        assert_eq!("TimerFd".parse::<TimerKind>(), Ok(TimerKind::TimerFd));
        assert_eq!(
            "hpet".parse::<TimerKind>(),
            Err(PaceError::UnknownTimer("hpet".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [TimerKind::Deadline, TimerKind::TimerFd] {
            assert_eq!(kind.to_string().parse::<TimerKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_boxed_source_delivers_ticks() {
        let config = PacingConfig::from_nanos(1_000, false).unwrap();
        let mut source = TimerKind::Deadline.start(&config).unwrap();
        assert!(source.wait().unwrap() >= 1);
    }
}
