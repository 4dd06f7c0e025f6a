//! Linux timerfd tick source
//!
//! The kernel keeps the expiration counter, so ticks that elapse while the
//! reader is busy are reported by the next read.

use crate::{PacingConfig, TickSource};
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::time::Duration;
use tracing::debug;

/// `CLOCK_MONOTONIC` interval timer backed by a timerfd
#[derive(Debug)]
pub struct TimerFd {
    file: File,
}

impl TimerFd {
    /// Create and arm the timer
    pub fn start(config: &PacingConfig) -> io::Result<Self> {
        // SAFETY: plain syscall with constant arguments; the result is checked.
        let raw = unsafe { libc::timerfd_create(libc::CLOCK_MONOTONIC, libc::TFD_CLOEXEC) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `raw` is a freshly created descriptor not owned elsewhere.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        let spec = libc::itimerspec {
            it_interval: timespec(config.interval()),
            it_value: timespec(config.first_deadline_offset()),
        };
        // SAFETY: `fd` is a valid timerfd and `spec` outlives the call.
        let rc = unsafe { libc::timerfd_settime(fd.as_raw_fd(), 0, &spec, std::ptr::null_mut()) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        debug!("Armed timerfd {}", fd.as_raw_fd());
        Ok(Self {
            file: File::from(fd),
        })
    }
}

impl TickSource for TimerFd {
    fn wait(&mut self) -> io::Result<u64> {
        let mut expirations = [0u8; 8];
        self.file.read_exact(&mut expirations)?;
        Ok(u64::from_ne_bytes(expirations))
    }
}

fn timespec(duration: Duration) -> libc::timespec {
    libc::timespec {
        tv_sec: duration.as_secs() as _,
        tv_nsec: duration.subsec_nanos() as _,
    }
}
