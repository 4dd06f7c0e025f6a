//! Pacing configuration

use crate::PaceError;
use std::time::Duration;

/// Largest accepted interval, just under one second
pub const MAX_NANOS_PER_BYTE: u32 = 999_999_999;

/// Baud rates must be strictly greater than this
pub const MIN_BAUD: u32 = 10;

/// Highest accepted baud rate
pub const MAX_BAUD: u32 = 1_000_000;

/// Default rate: 115200 baud N-8-1
pub const DEFAULT_BAUD: u32 = 115_200;

/// Bit times per byte on an N-8-1 UART (start + 8 data + stop)
const BITS_PER_BYTE: u32 = 10;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Resolved, validated pacing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    nanos_per_byte: u32,
    delay_first_byte: bool,
}

impl PacingConfig {
    /// Pace from an explicit nanoseconds-per-byte value
    pub fn from_nanos(nanos_per_byte: u32, delay_first_byte: bool) -> Result<Self, PaceError> {
        if nanos_per_byte == 0 || nanos_per_byte > MAX_NANOS_PER_BYTE {
            return Err(PaceError::InvalidNanos(nanos_per_byte));
        }
        Ok(Self {
            nanos_per_byte,
            delay_first_byte,
        })
    }

    /// Pace that simulates an N-8-1 UART at `baud`
    pub fn from_baud(baud: u32, delay_first_byte: bool) -> Result<Self, PaceError> {
        if baud <= MIN_BAUD || baud > MAX_BAUD {
            return Err(PaceError::InvalidBaud(baud));
        }
        // Truncate the bit time first, as a UART clock divider would
        let nanos_per_byte = BITS_PER_BYTE * (NANOS_PER_SECOND / baud);
        Self::from_nanos(nanos_per_byte, delay_first_byte)
    }

    /// Nanoseconds between output bytes
    pub fn nanos_per_byte(&self) -> u32 {
        self.nanos_per_byte
    }

    /// Whether the first byte also waits a full interval
    pub fn delay_first_byte(&self) -> bool {
        self.delay_first_byte
    }

    /// Interval between ticks
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(u64::from(self.nanos_per_byte))
    }

    /// Delay before the first tick: one interval, or effectively none
    pub fn first_deadline_offset(&self) -> Duration {
        if self.delay_first_byte {
            self.interval()
        } else {
            // A zero it_value would disarm a timerfd
            Duration::from_nanos(1)
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            nanos_per_byte: BITS_PER_BYTE * (NANOS_PER_SECOND / DEFAULT_BAUD),
            delay_first_byte: false,
        }
    }
}
