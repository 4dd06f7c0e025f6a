use std::path::PathBuf;

use clap::Parser;
use pace_timer::TimerKind;

use crate::Settings;

#[derive(Debug, Parser, Clone)]
#[command(name = "pace", version)]
#[command(about = "Write bytes from file or stdin to stdout at a specific pace")]
#[command(
    long_about = "Write bytes from file or stdin to stdout at a specific pace, defined as \
                  nanoseconds per byte. The default pace is 86800 nS per byte to simulate \
                  115,200 baud N-8-1 UART transfer."
)]
pub struct Cli {
    /// Input file; standard input when omitted.
    pub file: Option<PathBuf>,

    /// Simulate UART baud rate (11 to 1000000).
    #[arg(short = 'b', long, conflicts_with = "nanos")]
    pub baud: Option<u32>,

    /// Nanoseconds per byte (1 to 999999999).
    #[arg(short = 'n', long)]
    pub nanos: Option<u32>,

    /// Also delay before the first byte.
    #[arg(short = 'f', long)]
    pub first: bool,

    /// Ring buffer size in bytes.
    #[arg(short = 's', long)]
    pub size: Option<usize>,

    /// Report pace to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Tick source: timerfd (Linux) or deadline.
    #[arg(long)]
    pub timer: Option<TimerKind>,

    /// Settings file (toml, yaml or json).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Override lower settings layers with the flags that were given
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(baud) = self.baud {
            settings.baud = Some(baud);
            settings.nanos_per_byte = None;
        }
        if let Some(nanos) = self.nanos {
            settings.nanos_per_byte = Some(nanos);
            settings.baud = None;
        }
        if self.first {
            settings.delay_first_byte = true;
        }
        if let Some(size) = self.size {
            settings.buffer_size = size;
        }
        if self.verbose {
            settings.verbose = true;
        }
        if let Some(timer) = self.timer {
            settings.timer = timer;
        }
    }
}
