//! File-backed debug logging for tabshell
//!
//! Controlled by the `--log-level` CLI flag, then the DEBUG_LEVEL environment
//! variable, then the `log_level` config setting:
//! - 0 or unset: No debugging
//! - 1: Errors only
//! - 2: Warnings
//! - 3: Info level (restore, save, migration)
//! - 4: Debug level (ignored commands, pane repair)
//! - 5: Trace level (every change event)
//!
//! All output goes to `<temp dir>/tabshell_debug.log` so it never mixes with
//! the CLI's stdout.

use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl DebugLevel {
    fn from_env() -> Option<Self> {
        let val = std::env::var("DEBUG_LEVEL").ok()?;
        match val.trim().parse::<u8>() {
            Ok(0) => Some(DebugLevel::Off),
            Ok(1) => Some(DebugLevel::Error),
            Ok(2) => Some(DebugLevel::Warn),
            Ok(3) => Some(DebugLevel::Info),
            Ok(4) => Some(DebugLevel::Debug),
            Ok(_) => Some(DebugLevel::Trace),
            Err(_) => None,
        }
    }

    fn from_filter(filter: log::LevelFilter) -> Self {
        match filter {
            log::LevelFilter::Off => DebugLevel::Off,
            log::LevelFilter::Error => DebugLevel::Error,
            log::LevelFilter::Warn => DebugLevel::Warn,
            log::LevelFilter::Info => DebugLevel::Info,
            log::LevelFilter::Debug => DebugLevel::Debug,
            log::LevelFilter::Trace => DebugLevel::Trace,
        }
    }

    fn to_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Error,
            DebugLevel::Warn => log::LevelFilter::Warn,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => DebugLevel::Error,
            log::Level::Warn => DebugLevel::Warn,
            log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }
}

/// Location of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("tabshell_debug.log")
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new(level: DebugLevel) -> Self {
        let mut logger = DebugLogger { level, file: None };
        logger.open_file();
        logger
    }

    fn open_file(&mut self) {
        if self.level == DebugLevel::Off || self.file.is_some() {
            return;
        }
        // Silently stay file-less if the log can't be opened
        if let Ok(f) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            self.file = Some(f);
            self.write_raw(&format!(
                "\n{}\ntabshell debug session started at {} (level={:?})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                self.level,
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Warn => "WARN ",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_raw(&format!(
                "[{}] [{}] [{}] {}\n",
                get_timestamp(),
                level_str,
                category,
                msg
            ));
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| {
        Mutex::new(DebugLogger::new(
            DebugLevel::from_env().unwrap_or(DebugLevel::Off),
        ))
    })
}

fn get_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.6f").to_string()
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

/// Routes `log` crate records into the debug file.
struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        is_enabled(DebugLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Strip the crate prefix so categories read "session::persistence"
        let target = record.target();
        let category = target.strip_prefix("tabshell::").unwrap_or(target);
        log(
            DebugLevel::from_log(record.level()),
            category,
            &record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

static BRIDGE: LogBridge = LogBridge;

/// Install the `log` facade bridge.
///
/// An explicit `level` (from the CLI) wins over DEBUG_LEVEL. Without
/// either, logging stays off until [`set_level`] applies the config value.
pub fn init_log_bridge(level: Option<log::LevelFilter>) {
    let level = level
        .map(DebugLevel::from_filter)
        .or_else(DebugLevel::from_env)
        .unwrap_or(DebugLevel::Off);
    set_debug_level(level);
    // A second install (tests) is harmless; the first bridge stays active
    let _ = log::set_logger(&BRIDGE);
    log::set_max_level(level.to_filter());
}

/// Apply a level chosen after startup (the config's `log_level`).
pub fn set_level(filter: log::LevelFilter) {
    let level = DebugLevel::from_filter(filter);
    set_debug_level(level);
    log::set_max_level(filter);
}

fn set_debug_level(level: DebugLevel) {
    let mut logger = get_logger().lock();
    logger.level = level;
    logger.open_file();
}

/// Current effective level
pub fn current_level() -> log::LevelFilter {
    get_logger().lock().level.to_filter()
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_round_trip_ordering() {
        assert_eq!(
            DebugLevel::from_filter(log::LevelFilter::Warn),
            DebugLevel::Warn
        );
        assert!(DebugLevel::Error < DebugLevel::Trace);
        assert_eq!(DebugLevel::Info.to_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_log_path_in_temp_dir() {
        assert!(log_path().starts_with(std::env::temp_dir()));
        assert!(log_path().ends_with("tabshell_debug.log"));
    }
}
