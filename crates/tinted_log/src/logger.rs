//! The logger facade.

use std::error::Error as StdError;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::LogConfig;
use crate::context::Context;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::level::Level;
use crate::trace::{ANNOTATION, ErrorTrace};

/// Exit code used by [`Logger::critical`].
pub const DEFAULT_CRITICAL_CODE: i32 = 1;

/// Lead line of an error logged without a message of its own.
pub const CAUGHT_ERROR_MESSAGE: &str = "An exception was caught";

/// A cloneable handle to one [`LogConfig`].
///
/// Create one at startup and hand clones to whatever needs to log. A single
/// mutex guards the configuration, so lines from concurrent threads never
/// interleave.
///
/// The `log`/`debug`/`warning`/`error`/`critical` methods find their caller
/// with a stack walk (see [`Context::capture`]). The [`info!`](crate::info),
/// [`debug!`](crate::debug), [`warning!`](crate::warning),
/// [`error!`](crate::error) and [`critical!`](crate::critical) macros name
/// the caller at compile time instead.
///
/// # Example
///
/// ```rust
/// use tinted_log::Logger;
///
/// let logger = Logger::new();
/// logger.log("service started");
/// logger.warning("cache is cold");
/// ```
#[derive(Clone, Default)]
pub struct Logger {
    inner: Arc<Mutex<LogConfig>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &*self.lock())
            .finish()
    }
}

impl From<LogConfig> for Logger {
    fn from(config: LogConfig) -> Self {
        Self::with_config(config)
    }
}

impl Logger {
    /// Creates a logger with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LogConfig::new())
    }

    /// Creates a logger around an existing configuration.
    #[must_use]
    pub fn with_config(config: LogConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogConfig> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the configuration.
    ///
    /// ```rust
    /// use tinted_log::{Logger, tint::Color};
    ///
    /// let logger = Logger::new();
    /// logger.configure(|config| {
    ///     config.set_console_format("{type} {message}");
    ///     config.set_color("INFO", Color::CYAN);
    /// });
    /// ```
    pub fn configure<R>(&self, f: impl FnOnce(&mut LogConfig) -> R) -> R {
        f(&mut self.lock())
    }

    // =========================================================================
    // Configuration shortcuts
    // =========================================================================

    /// Enables or disables debug-level output.
    pub fn set_debug_mode(&self, debug: bool) {
        self.lock().set_debug_mode(debug);
    }

    /// Returns true if debug-level output is enabled.
    #[must_use]
    pub fn is_debug_mode(&self) -> bool {
        self.lock().is_debug_mode()
    }

    /// Sets append mode, reopening the log file (see
    /// [`LogConfig::set_append_mode`]).
    pub fn set_append_mode(&self, append: bool) {
        self.lock().set_append_mode(append);
    }

    /// Returns true if the log file is appended to.
    #[must_use]
    pub fn is_append_mode(&self) -> bool {
        self.lock().is_append_mode()
    }

    /// Opens the log file.
    ///
    /// # Errors
    ///
    /// See [`LogConfig::open_log_file`].
    pub fn open_log_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.lock().open_log_file(path)
    }

    /// Flushes and closes the log file.
    pub fn close_log_file(&self) {
        self.lock().close_log_file();
    }

    /// Returns the configured log file path.
    #[must_use]
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.lock().log_file_path().map(Path::to_path_buf)
    }

    /// Replaces the console writer.
    pub fn set_console_writer(&self, writer: Box<dyn Write + Send>) {
        self.lock().set_console_writer(writer);
    }

    /// Applies a configuration document.
    ///
    /// # Errors
    ///
    /// See [`LogConfig::load_from_document`].
    pub fn load_from_document(&self, doc: &ConfigDocument) -> Result<()> {
        self.lock().load_from_document(doc)
    }

    /// Decodes and applies a JSON configuration document.
    ///
    /// # Errors
    ///
    /// See [`LogConfig::load_from_json`].
    pub fn load_from_json(&self, bytes: &[u8]) -> Result<()> {
        self.lock().load_from_json(bytes)
    }

    /// Decodes and applies a TOML configuration document.
    ///
    /// # Errors
    ///
    /// See [`LogConfig::load_from_toml`].
    pub fn load_from_toml(&self, text: &str) -> Result<()> {
        self.lock().load_from_toml(text)
    }

    /// Reads and applies a configuration file.
    ///
    /// # Errors
    ///
    /// See [`LogConfig::load_from_file`].
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.lock().load_from_file(path)
    }

    // =========================================================================
    // Logging
    // =========================================================================

    /// Logs `message` at `level` with an explicit caller context.
    ///
    /// DEBUG messages are dropped unless debug mode is on. CRITICAL messages
    /// are written like any other and do not exit; use the `critical*`
    /// methods for that.
    pub fn emit(&self, level: Level, context: &Context, message: &str) {
        self.lock().emit(level, context, message);
    }

    /// Logs at INFO.
    pub fn log(&self, message: &str) {
        self.emit(Level::Info, &Context::capture(), message);
    }

    /// Logs at DEBUG if debug mode is on; otherwise does nothing.
    pub fn debug(&self, message: &str) {
        if !self.is_debug_mode() {
            return;
        }
        self.emit(Level::Debug, &Context::capture(), message);
    }

    /// Logs at WARNING.
    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, &Context::capture(), message);
    }

    /// Logs at ERROR.
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, &Context::capture(), message);
    }

    /// Logs at ERROR with a trace of `err` appended to the message.
    pub fn error_with<E>(&self, message: &str, err: &E)
    where
        E: StdError + 'static,
    {
        let trace = ErrorTrace::of(err);
        self.emit(
            Level::Error,
            &Context::capture(),
            &annotate(message, &trace.to_string()),
        );
    }

    /// Logs `err` at ERROR under [`CAUGHT_ERROR_MESSAGE`].
    pub fn error_from<E>(&self, err: &E)
    where
        E: StdError + 'static,
    {
        let trace = ErrorTrace::of(err);
        self.emit(
            Level::Error,
            &Context::capture(),
            &annotate(CAUGHT_ERROR_MESSAGE, &trace.to_string()),
        );
    }

    /// Logs at CRITICAL and exits with code 1.
    pub fn critical(&self, message: &str) -> ! {
        let code = self.record_critical(&Context::capture(), message, DEFAULT_CRITICAL_CODE);
        process::exit(code)
    }

    /// Logs at CRITICAL and exits with `code`.
    pub fn critical_code(&self, message: &str, code: i32) -> ! {
        let code = self.record_critical(&Context::capture(), message, code);
        process::exit(code)
    }

    /// Logs `err` at CRITICAL and exits with a code derived from it
    /// (see [`ErrorTrace::exit_code`]).
    ///
    /// Without a message the record reads [`CAUGHT_ERROR_MESSAGE`].
    pub fn critical_error<E>(&self, message: Option<&str>, err: &E) -> !
    where
        E: StdError + 'static,
    {
        let trace = ErrorTrace::of(err);
        let text = annotate(message.unwrap_or(CAUGHT_ERROR_MESSAGE), &trace.to_string());
        let code = self.record_critical(&Context::capture(), &text, trace.exit_code());
        process::exit(code)
    }

    /// Writes a CRITICAL record annotated with `--> Critical error code: {code}`
    /// and flushes every sink, without exiting. Returns `code`.
    ///
    /// This is everything the `critical*` methods do before calling
    /// [`std::process::exit`].
    pub fn record_critical(&self, context: &Context, message: &str, code: i32) -> i32 {
        let annotated = annotate(message, &format!("{ANNOTATION}Critical error code: {code}"));
        let mut config = self.lock();
        config.emit(Level::Critical, context, &annotated);
        config.flush();
        code
    }
}

/// Appends an annotation block on the line after `message`.
fn annotate(message: &str, annotation: &str) -> String {
    format!("{message}\n{annotation}")
}
