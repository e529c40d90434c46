use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Each `-v` raises the level by one step, saturating at trace.
    pub fn raised(self, steps: u8) -> LogLevel {
        let all = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let position = all.iter().position(|l| *l == self).unwrap_or(0);
        all[(position + steps as usize).min(all.len() - 1)]
    }

    fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Logs go to a kept temporary file since the terminal belongs to the UI.
pub fn init_file_logging(level: LogLevel) -> Result<PathBuf> {
    let prefix = format!("cpc_{:03}_", Utc::now().timestamp().rem_euclid(1000));
    let file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".log")
        .tempfile()?;
    let (file, path) = file.keep().map_err(|e| e.error)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level.filter())
        .with_target(true)
        .init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raised() {
        assert_eq!(LogLevel::Warn.raised(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.raised(2), LogLevel::Debug);
        assert_eq!(LogLevel::Info.raised(10), LogLevel::Trace);
    }
}
