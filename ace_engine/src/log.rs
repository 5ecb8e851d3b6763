//! Internal logging system for Ace Engine
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - A flat log file that is restarted at startup and appended to afterwards
//! - A bridge so records emitted through the `log` facade land in the same sink
//! - File and line information for detailed ERROR logs

use chrono::{DateTime, Local};
use colored::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Default name of the flat log file
pub const GL_LOG_FILE: &str = "gl.log";

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom loggers (file logging, test capture, etc.)
///
/// # Example
///
/// ```no_run
/// use ace_engine::ace::log::{Logger, LogEntry};
///
/// struct CountingLogger;
///
/// impl Logger for CountingLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Count or forward the entry...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "ace::Shader", "ace::opengl")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (usage errors, missing uniforms)
    Warn,

    /// Error messages (failed loads, failed init) with file:line details
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in both console and file output
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

impl From<::log::Level> for LogSeverity {
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Trace => LogSeverity::Trace,
            ::log::Level::Debug => LogSeverity::Debug,
            ::log::Level::Info => LogSeverity::Info,
            ::log::Level::Warn => LogSeverity::Warn,
            ::log::Level::Error => LogSeverity::Error,
        }
    }
}

fn format_timestamp(timestamp: SystemTime) -> String {
    let datetime: DateTime<Local> = timestamp.into();
    datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Format an entry without colors: `[timestamp] [SEVERITY] [source] message (file:line)`
pub fn format_plain(entry: &LogEntry) -> String {
    let timestamp = format_timestamp(entry.timestamp);
    match (entry.file, entry.line) {
        (Some(file), Some(line)) => format!(
            "[{}] [{}] [{}] {} ({}:{})",
            timestamp,
            entry.severity.label(),
            entry.source,
            entry.message,
            file,
            line
        ),
        _ => format!(
            "[{}] [{}] [{}] {}",
            timestamp,
            entry.severity.label(),
            entry.source,
            entry.message
        ),
    }
}

fn format_colored(entry: &LogEntry) -> String {
    let timestamp = format_timestamp(entry.timestamp);

    let severity_str = match entry.severity {
        LogSeverity::Trace => entry.severity.label().bright_black(),
        LogSeverity::Debug => entry.severity.label().cyan(),
        LogSeverity::Info => entry.severity.label().green(),
        LogSeverity::Warn => entry.severity.label().yellow(),
        LogSeverity::Error => entry.severity.label().red().bold(),
    };

    let source = entry.source.bright_blue();

    if let (Some(file), Some(line)) = (entry.file, entry.line) {
        format!(
            "[{}] [{}] [{}] {} ({}:{})",
            timestamp, severity_str, source, entry.message, file, line
        )
    } else {
        format!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message)
    }
}

/// Default logger implementation using colored console output
///
/// Colors:
/// - Trace: bright black
/// - Debug: cyan
/// - Info: green
/// - Warn: yellow
/// - Error: red + bold
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        println!("{}", format_colored(entry));
    }
}

/// Flat-file logger
///
/// The file is truncated by [`FileLogger::restart`] and every entry is
/// appended for the lifetime of the process. Warnings and errors are mirrored
/// to stderr; other entries go to stdout when at or above the console level.
pub struct FileLogger {
    file: Mutex<File>,
    path: PathBuf,
    console_level: Option<LogSeverity>,
}

impl FileLogger {
    /// Truncate (or create) the log file and write the header line.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be opened for writing.
    pub fn restart<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path).map_err(|e| {
            Error::Io(format!(
                "could not open log file {} for writing: {}",
                path.display(),
                e
            ))
        })?;

        let now: DateTime<Local> = Local::now();
        writeln!(
            file,
            "GL_LOG_FILE log. local time {}",
            now.format("%a %b %e %H:%M:%S %Y")
        )?;
        file.flush()?;

        Ok(Self {
            file: Mutex::new(file),
            path,
            console_level: Some(LogSeverity::Info),
        })
    }

    /// Set the minimum severity echoed to stdout. `None` keeps stdout quiet
    /// (warnings and errors still reach stderr).
    pub fn with_console_level(mut self, level: Option<LogSeverity>) -> Self {
        self.console_level = level;
        self
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger for FileLogger {
    fn log(&self, entry: &LogEntry) {
        if let Ok(mut file) = self.file.lock() {
            // A failed write must never take the render loop down
            let _ = writeln!(file, "{}", format_plain(entry));
            let _ = file.flush();
        }

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", format_colored(entry));
        } else if self.console_level.is_some_and(|level| entry.severity >= level) {
            println!("{}", format_colored(entry));
        }
    }
}

/// Forwards records from the `log` facade into the engine logger.
///
/// Windowing and context crates report through `log`; installing the bridge
/// makes those records appear in `gl.log` next to engine messages.
pub struct LogBridge {
    level: ::log::LevelFilter,
}

impl LogBridge {
    /// Install the bridge as the global `log` logger.
    ///
    /// Returns `false` if another `log` logger was already installed.
    pub fn install(level: ::log::LevelFilter) -> bool {
        let installed = ::log::set_boxed_logger(Box::new(LogBridge { level })).is_ok();
        if installed {
            ::log::set_max_level(level);
        }
        installed
    }
}

impl ::log::Log for LogBridge {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &::log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::ace::Engine::log(
            record.level().into(),
            record.target(),
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// ace_engine::engine_trace!("ace::Shader", "Entering reload()");
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::ace::Engine::log(
            $crate::ace::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::ace::Engine::log(
            $crate::ace::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```no_run
/// ace_engine::engine_info!("ace::Engine", "Shader programme {} loaded", 3);
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::ace::Engine::log(
            $crate::ace::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (usage errors, potential issues)
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::ace::Engine::log(
            $crate::ace::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::ace::Engine::log_detailed(
            $crate::ace::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and evaluate to an `Error::BackendError` with the same message
///
/// # Example
///
/// ```no_run
/// # fn f() -> ace_engine::ace::Result<()> {
/// let program = None::<u32>
///     .ok_or_else(|| ace_engine::engine_err!("ace::opengl", "glCreateProgram failed"))?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::ace::Engine::log_detailed(
            $crate::ace::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::ace::Error::BackendError(message)
    }};
}

/// Log an ERROR and return `Err(Error::BackendError)` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
