/// Structured logging for the launch conditions service
///
/// Provides context-rich logging with resource and launch site identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging for unattended dashboard refreshes.

use crate::model::ConditionError;
use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Weather,
    LaunchScore,
    Schedule,
    Map,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Weather => write!(f, "WX"),
            DataSource::LaunchScore => write!(f, "SCORE"),
            DataSource::Schedule => write!(f, "SCHED"),
            DataSource::Map => write!(f, "MAP"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

impl From<crate::model::ResourceKind> for DataSource {
    fn from(kind: crate::model::ResourceKind) -> Self {
        match kind {
            crate::model::ResourceKind::Weather => DataSource::Weather,
            crate::model::ResourceKind::LaunchScore => DataSource::LaunchScore,
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the backend is rate limiting or the user declined sample data
    Expected,
    /// Unexpected failure - network trouble, timeouts, or a malformed response
    Unexpected,
    /// Unknown - the backend reported an error we cannot judge
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    /// Formats the line written to the log file (and to the console in
    /// timestamp mode).
    fn format_entry(level: LogLevel, source: DataSource, site: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let site_part = site.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, site_part, message)
    }

    fn log(&self, level: LogLevel, source: DataSource, site: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, site, message);
        let site_part = site.map(|s| format!(" [{}]", s)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, site_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, site_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", source, site_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, source: DataSource, site: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, source, site, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: DataSource, site: Option<&str>, message: &str) {
    emit(LogLevel::Info, source, site, message);
}

/// Log a warning message
pub fn warn(source: DataSource, site: Option<&str>, message: &str) {
    emit(LogLevel::Warning, source, site, message);
}

/// Log an error message
pub fn error(source: DataSource, site: Option<&str>, message: &str) {
    emit(LogLevel::Error, source, site, message);
}

/// Log a debug message
pub fn debug(source: DataSource, site: Option<&str>, message: &str) {
    emit(LogLevel::Debug, source, site, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch failure by its error kind
pub fn classify_failure(err: &ConditionError) -> FailureType {
    match err {
        ConditionError::LimitReached => FailureType::Expected,
        ConditionError::Transport(_)
        | ConditionError::Parse(_)
        | ConditionError::Timeout { .. }
        | ConditionError::UnknownLocation(_) => FailureType::Unexpected,
        ConditionError::Upstream(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a fetch failure with automatic classification
pub fn log_fetch_failure(source: DataSource, site: &str, operation: &str, err: &ConditionError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, Some(site), &message),
        FailureType::Unexpected => error(source, Some(site), &message),
        FailureType::Unknown => warn(source, Some(site), &message),
    }
}

/// Log an upstream rate-limit signal (warning level)
pub fn log_rate_limited(source: DataSource, site: &str, use_sample: bool) {
    let message = if use_sample {
        "rate limited even for sample data".to_string()
    } else {
        "rate limited; sample data can be offered".to_string()
    };
    warn(source, Some(site), &message);
}

// ---------------------------------------------------------------------------
// Map Refresh Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a map score refresh
pub fn log_aggregate_summary(total: usize, scored: usize) {
    let missing = total - scored.min(total);
    let message = format!("Map refresh complete: {}/{} sites scored, {} missing", scored, total, missing);

    if missing == 0 {
        info(DataSource::Map, None, &message);
    } else if scored == 0 {
        error(DataSource::Map, None, &message);
    } else {
        warn(DataSource::Map, None, &message);
    }
}
