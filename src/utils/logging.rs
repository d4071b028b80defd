// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record};

use super::{AppError, AppResult};

/// Initialize logging with the given level, writing to stdout or to an append-mode file
pub fn init_logging(level: LevelFilter, file: Option<&str>) -> AppResult<()> {
    let sink = match file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    log::set_boxed_logger(Box::new(SimpleLogger {
        level,
        file: Mutex::new(sink),
    }))
    .map(|()| log::set_max_level(level))
    .map_err(|e| AppError::Config(format!("Logger already initialized: {}", e)))
}

/// Simple logger implementation
struct SimpleLogger {
    level: LevelFilter,
    file: Mutex<Option<File>>,
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match file.as_mut() {
            Some(file) => {
                let _ = writeln!(file, "[{}] {}: {}", timestamp, record.level(), record.args());
            }
            None => {
                let level_str = match record.level() {
                    Level::Error => "\x1B[31mERROR\x1B[0m",
                    Level::Warn => "\x1B[33mWARN\x1B[0m",
                    Level::Info => "\x1B[32mINFO\x1B[0m",
                    Level::Debug => "\x1B[34mDEBUG\x1B[0m",
                    Level::Trace => "\x1B[90mTRACE\x1B[0m",
                };
                println!("[{}] {}: {}", timestamp, level_str, record.args());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
