// src/utils/log.rs

//! Minimal stderr backend for the `log` facade.
//!
//! The library only emits records through `log` macros; binaries decide
//! whether anything is printed by calling [`init_logging`].

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

use crate::utils::error::{CodecError, Result};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // A failed diagnostic write is not worth aborting over.
        let _ = writeln!(
            stderr,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs the stderr logger with the given maximum level.
///
/// Fails if another logger has already been installed in this process.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER)
        .map_err(|e| CodecError::InvalidArg(format!("logger already installed: {}", e)))?;
    log::set_max_level(level);
    Ok(())
}
