#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Tinted Log
//!
//! Templated, colorized logging to the console and one file.
//!
//! - Five levels: INFO, DEBUG (only in debug mode), WARNING, ERROR and
//!   CRITICAL (which terminates the process)
//! - `{field}` templates for console and file lines
//! - Per-field and per-level 24-bit colors on the console, plain text in the
//!   file
//! - Configuration from setters or a JSON/TOML document
//!
//! ## Example
//!
//! ```rust
//! use tinted_log::Logger;
//!
//! let logger = Logger::new();
//! logger
//!     .load_from_json(br#"{"formats": {"console": "{type} {message}"}}"#)
//!     .unwrap();
//! logger.log("Application started");
//! tinted_log::warning!(logger, "{} retries left", 2);
//! ```
//!
//! ## Output
//!
//! The console template defaults to `[{type}][{context}]: {message}` and the
//! file template to `{date} [{type}][{context}]: {message}`. Every console
//! line ends with a color reset. File lines are flushed as they are written.
//!
//! ## Concurrency
//!
//! Calls are synchronous. A [`Logger`] serializes all writes through one
//! mutex; a bare [`LogConfig`] is `&mut self` and needs its own guard if
//! shared.

pub mod colors;
pub mod config;
pub mod context;
pub mod date;
pub mod document;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod trace;

pub use tint;

pub use colors::ColorTable;
pub use config::{
    DEFAULT_CONSOLE_FORMAT, DEFAULT_DATE_FORMAT, DEFAULT_FILE_FORMAT, ErrorHandler, LogConfig,
};
pub use context::Context;
pub use document::{ConfigDocument, Formats};
pub use error::{ConfigParseError, Error, Result};
pub use level::{Level, ParseLevelError};
pub use logger::{CAUGHT_ERROR_MESSAGE, DEFAULT_CRITICAL_CODE, Logger};
pub use record::Record;
pub use trace::ErrorTrace;

/// Logs at INFO, naming the enclosing function as context.
///
/// ```rust
/// let logger = tinted_log::Logger::new();
/// tinted_log::info!(logger, "listening on {}", 8080);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit($crate::Level::Info, &$crate::context!(), &::std::format!($($arg)+))
    };
}

/// Logs at DEBUG (when debug mode is on), naming the enclosing function.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit($crate::Level::Debug, &$crate::context!(), &::std::format!($($arg)+))
    };
}

/// Logs at WARNING, naming the enclosing function.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit($crate::Level::Warning, &$crate::context!(), &::std::format!($($arg)+))
    };
}

/// Logs at ERROR, naming the enclosing function.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit($crate::Level::Error, &$crate::context!(), &::std::format!($($arg)+))
    };
}

/// Logs at CRITICAL, naming the enclosing function, then exits with code 1.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {{
        let code = $logger.record_critical(
            &$crate::context!(),
            &::std::format!($($arg)+),
            $crate::DEFAULT_CRITICAL_CODE,
        );
        ::std::process::exit(code)
    }};
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::tint::Color;
    pub use crate::{
        CAUGHT_ERROR_MESSAGE, ColorTable, ConfigDocument, Context, DEFAULT_CONSOLE_FORMAT,
        DEFAULT_CRITICAL_CODE, DEFAULT_DATE_FORMAT, DEFAULT_FILE_FORMAT, Error, ErrorHandler,
        ErrorTrace, Level, LogConfig, Logger, ParseLevelError, Record, Result,
    };
}
