//! File logging. The terminal belongs to the UI, so every event goes to a log
//! file under the state directory instead of stdout or stderr.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log path {0} has no file name")]
    InvalidPath(PathBuf),
    #[error("can't create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("can't open log file: {0}")]
    Appender(#[from] InitError),
    #[error("failed to install the global subscriber: {0}")]
    Init(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Appender that writes to exactly `path`, never rotating.
pub fn try_create_appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(parent)?)
}

/// Installs the global subscriber. `LogLevel::Off` installs nothing.
pub fn init(path: &Path, level: LogLevel) -> Result<(), LoggingError> {
    if level == LogLevel::Off {
        return Ok(());
    }

    let appender = try_create_appender(path)?;
    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_max_level(LevelFilter::from(level))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
