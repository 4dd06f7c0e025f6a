//! pace: serial-link pacing for byte streams
//!
//! Glue between the command line, settings, logging and the paced pipeline.

use anyhow::Context;
use pace_pipeline::{Completion, Pipeline};
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod settings;

pub use cli::Cli;
pub use settings::{Settings, SettingsError};

/// Initialize logging on stderr; stdout carries the paced data
pub fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .finish();

    // Already installed when embedded in a host that set its own subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Unbuffered handle on fd 1; every `write` is a single system call
#[cfg(unix)]
fn output_sink() -> io::Result<impl Write + Send> {
    use std::os::fd::AsFd;

    let fd = io::stdout().as_fd().try_clone_to_owned()?;
    Ok(File::from(fd))
}

#[cfg(not(unix))]
fn output_sink() -> io::Result<impl Write + Send> {
    Ok(io::stdout())
}

/// Resolve settings, open the input and pace it to stdout
pub fn run(cli: Cli) -> anyhow::Result<Completion> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    init_logging(settings.log_level()?);
    let config = settings.pipeline_config()?;

    let input: Box<dyn Read> = match &cli.file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Can't open {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdin().lock()),
    };

    info!(
        "Input {}, {} timer",
        cli.file
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |path| path.display().to_string()),
        settings.timer
    );

    let output = output_sink().context("Can't open stdout")?;
    let timer = settings.timer;
    let verbose = settings.verbose;
    // Called only once the first read returned data
    let completion = Pipeline::new(config).run(input, output, |pacing| {
        if verbose {
            eprintln!("Pace is {}nS per byte", pacing.nanos_per_byte());
        }
        timer.start(pacing)
    })?;
    Ok(completion)
}
