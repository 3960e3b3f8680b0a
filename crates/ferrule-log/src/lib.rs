//! A minimal, zero-dependency logging crate for the Ferrule compiler.
//!
//! Messages go to stderr so they never mix with tree dumps or other
//! compiler output written to stdout. Each record carries the module path of
//! the call site. The minimum level is global and can be set in code or read
//! once from the `FERRULE_LOG` environment variable.
//!
//! # Example
//!
//! ```
//! use ferrule_log::{debug, error, info, warn, Level};
//!
//! ferrule_log::set_level(Level::Debug);
//!
//! let nodes = 12;
//! info!("allocated {} expression nodes", nodes);
//! debug!("chunk sizes: {:?}", vec![8192, 16384]);
//! warn!("tuple has mismatched delimiters");
//! error!("integer literal failed to parse");
//! ```

use std::fmt::Arguments;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "FERRULE_LOG";

/// Severity of a log record.
///
/// Ordered from most severe (`Error`) to least severe (`Trace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Internal faults and broken invariants
    Error = 0,
    /// Suspicious input that is still handled
    Warn = 1,
    /// High-level progress
    Info = 2,
    /// Detailed diagnostic information
    Debug = 3,
    /// Per-node tracing
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

/// Error returned when a level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl std::fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid log level '{}'", self.input)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use ferrule_log::Level;
    ///
    /// assert_eq!("trace".parse::<Level>(), Ok(Level::Trace));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// The process-wide logger.
pub struct Logger {
    level: AtomicU8,
    color: AtomicBool,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            color: AtomicBool::new(true),
        }
    }

    /// Sets the minimum level that will be emitted.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Enables or disables ANSI colors in the level tag.
    pub fn set_color(&self, enabled: bool) {
        self.color.store(enabled, Ordering::Relaxed);
    }

    /// Returns `true` if a record at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    fn render(&self, level: Level, target: &str, args: Arguments) -> String {
        if self.color.load(Ordering::Relaxed) {
            format!(
                "{}[{}]\x1b[0m {target}: {args}",
                level.color_code(),
                level.as_str()
            )
        } else {
            format!("[{}] {target}: {args}", level.as_str())
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at `Level::Warn` on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Configures the global logger from the environment.
///
/// Reads [`LOG_ENV_VAR`] for the level and honours `NO_COLOR`. An unset
/// variable keeps the current level; an unparsable one is reported and
/// ignored.
///
/// Returns the level in effect afterwards.
pub fn init_from_env() -> Level {
    let level = std::env::var(LOG_ENV_VAR).ok();
    configure(
        get_logger(),
        level.as_deref(),
        std::env::var_os("NO_COLOR").is_some(),
    )
}

fn configure(logger: &Logger, level: Option<&str>, no_color: bool) -> Level {
    if no_color {
        logger.set_color(false);
    }
    if let Some(raw) = level {
        match raw.parse::<Level>() {
            Ok(level) => logger.set_level(level),
            Err(err) => eprintln!("{LOG_ENV_VAR}: {err}"),
        }
    }
    logger.level()
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }
    eprintln!("{}", logger.render(level, target, args));
}

/// Returns `true` if records at the given level are currently emitted.
///
/// Useful to skip building expensive messages such as tree dumps.
#[macro_export]
macro_rules! log_enabled {
    ($level:expr) => {
        $crate::get_logger().enabled($level)
    };
}

/// Logs a message at an explicit level.
///
/// ```
/// use ferrule_log::{log, Level};
///
/// log!(level: Level::Info, "arena holds {} chunks", 2);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at `Level::Error`.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at `Level::Warn`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at `Level::Info`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at `Level::Debug`.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at `Level::Trace`.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("error".parse(), Ok(Level::Error));
        assert_eq!("Warning".parse(), Ok(Level::Warn));
        assert_eq!(" info ".parse(), Ok(Level::Info));
        assert_eq!("DEBUG".parse(), Ok(Level::Debug));
        assert_eq!("trace".parse(), Ok(Level::Trace));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let err = "loud".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "invalid log level 'loud'");
    }

    #[test]
    fn test_logger_filtering() {
        let logger = Logger::new(Level::Info);

        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(Level::Trace);
        assert!(logger.enabled(Level::Trace));
        assert_eq!(logger.level(), Level::Trace);
    }

    #[test]
    fn test_render_without_color() {
        let logger = Logger::new(Level::Info);
        logger.set_color(false);

        let line = logger.render(Level::Warn, "ferrule_ast::expr", format_args!("n={}", 3));
        assert_eq!(line, "[WARN] ferrule_ast::expr: n=3");
    }

    #[test]
    fn test_render_with_color() {
        let logger = Logger::new(Level::Info);

        let line = logger.render(Level::Error, "t", format_args!("boom"));
        assert!(line.starts_with("\x1b[31m[ERROR]"));
        assert!(line.ends_with("t: boom"));
    }

    #[test]
    fn test_configure_from_environment_values() {
        let logger = Logger::new(Level::Warn);

        assert_eq!(configure(&logger, None, false), Level::Warn);
        assert_eq!(configure(&logger, Some("debug"), false), Level::Debug);
        assert_eq!(configure(&logger, Some("loud"), false), Level::Debug);

        configure(&logger, None, true);
        let line = logger.render(Level::Info, "t", format_args!("x"));
        assert_eq!(line, "[INFO] t: x");
    }

    #[test]
    fn test_macros_compile_at_every_level() {
        set_level(Level::Trace);
        error!("e {}", 1);
        warn!("w");
        info!("i");
        debug!("d {:?}", [1, 2]);
        trace!("t");
        assert!(log_enabled!(Level::Trace));
        set_level(Level::Warn);
    }
}
