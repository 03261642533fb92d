//! Logging configuration and the console/file write path.
//!
//! [`LogConfig`] owns every piece of mutable logging state: flags, templates,
//! the color table, the console writer and the open log file. It is usually
//! driven through a [`Logger`](crate::Logger), which serializes access with a
//! mutex; used directly it is a plain `&mut self` value.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tint::Color;

use crate::colors::ColorTable;
use crate::context::Context;
use crate::date;
use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use crate::format::format;
use crate::level::Level;
use crate::record::Record;

/// Default date pattern.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";
/// Default console template.
pub const DEFAULT_CONSOLE_FORMAT: &str = "[{type}][{context}]: {message}";
/// Default file template.
pub const DEFAULT_FILE_FORMAT: &str = "{date} [{type}][{context}]: {message}";

/// Context of the lines written while loading a configuration document.
const LOAD_CONTEXT: &str = "LogConfig.load_from_document";

/// Callback for failures that must not abort a log call.
///
/// Write, flush and re-open failures are handed to this callback instead of
/// being returned. The default handler prints them to stderr.
///
/// # Example
///
/// ```rust
/// use tinted_log::LogConfig;
///
/// let mut config = LogConfig::new();
/// config.set_error_handler(|err| {
///     // Alert monitoring, fall back to another sink, etc.
///     eprintln!("logging failed: {err}");
/// });
/// ```
pub type ErrorHandler = Arc<dyn Fn(&Error) + Send + Sync>;

fn default_error_handler() -> ErrorHandler {
    Arc::new(|err| {
        let _ = writeln!(io::stderr(), "tinted_log: {err}");
    })
}

/// All mutable logging state.
pub struct LogConfig {
    debug_mode: bool,
    append_mode: bool,
    date_format: String,
    console_format: String,
    file_format: String,
    colors: ColorTable,
    console: Box<dyn Write + Send>,
    log_file_path: Option<PathBuf>,
    /// `Some` iff `log_file_path` was opened and not yet closed.
    log_file: Option<File>,
    error_handler: ErrorHandler,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("debug_mode", &self.debug_mode)
            .field("append_mode", &self.append_mode)
            .field("date_format", &self.date_format)
            .field("console_format", &self.console_format)
            .field("file_format", &self.file_format)
            .field("colors", &self.colors)
            .field("log_file_path", &self.log_file_path)
            .field("log_file_open", &self.log_file.is_some())
            .finish_non_exhaustive()
    }
}

impl LogConfig {
    /// Creates a configuration with the built-in defaults: debug off,
    /// append on, default templates and colors, console on stdout, no file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            append_mode: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            console_format: DEFAULT_CONSOLE_FORMAT.to_string(),
            file_format: DEFAULT_FILE_FORMAT.to_string(),
            colors: ColorTable::new(),
            console: Box::new(io::stdout()),
            log_file_path: None,
            log_file: None,
            error_handler: default_error_handler(),
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Enables or disables debug-level output.
    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug_mode = debug;
    }

    /// Returns true if debug-level output is enabled.
    #[must_use]
    pub const fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Sets append (true) or truncate (false) mode.
    ///
    /// If a log file is configured it is closed and reopened under the new
    /// mode, so `false` truncates it right away. A failed reopen is reported
    /// to the error handler and leaves no file open.
    pub fn set_append_mode(&mut self, append: bool) {
        self.append_mode = append;
        let Some(path) = self.log_file_path.clone() else {
            return;
        };
        self.release_file();
        match open_file(&path, append) {
            Ok(file) => self.log_file = Some(file),
            Err(source) => self.report(&Error::io(&path, source)),
        }
    }

    /// Returns true if the log file is appended to rather than truncated.
    #[must_use]
    pub const fn is_append_mode(&self) -> bool {
        self.append_mode
    }

    // =========================================================================
    // Templates and colors
    // =========================================================================

    /// Returns the date pattern.
    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Sets the date pattern (see [`date`](crate::date)).
    pub fn set_date_format(&mut self, pattern: impl Into<String>) {
        self.date_format = pattern.into();
    }

    /// Returns the console template.
    #[must_use]
    pub fn console_format(&self) -> &str {
        &self.console_format
    }

    /// Sets the console template.
    pub fn set_console_format(&mut self, template: impl Into<String>) {
        self.console_format = template.into();
    }

    /// Returns the file template.
    #[must_use]
    pub fn file_format(&self) -> &str {
        &self.file_format
    }

    /// Sets the file template.
    pub fn set_file_format(&mut self, template: impl Into<String>) {
        self.file_format = template.into();
    }

    /// Returns the color table.
    #[must_use]
    pub const fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Returns the color for a field or level name, if the table has one.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<Color> {
        self.colors.get(name)
    }

    /// Returns the color table for in-place edits.
    pub const fn colors_mut(&mut self) -> &mut ColorTable {
        &mut self.colors
    }

    /// Replaces the color table.
    pub fn set_colors(&mut self, colors: ColorTable) {
        self.colors = colors;
    }

    /// Sets one color-table entry.
    pub fn set_color(&mut self, name: impl Into<String>, color: Color) {
        self.colors.set(name, color);
    }

    /// Replaces the console writer (stdout by default).
    pub fn set_console_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.console = writer;
    }

    /// Sets the handler for failures that are reported rather than returned.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
    }

    // =========================================================================
    // Log file
    // =========================================================================

    /// Opens (creating if needed) the log file at `path` in the current
    /// append mode, creating missing parent directories.
    ///
    /// On success any previously open file is flushed and closed. On failure
    /// the previous file, if any, stays open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the path cannot be opened for writing.
    pub fn open_log_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = open_file(path, self.append_mode).map_err(|source| Error::io(path, source))?;
        self.release_file();
        self.log_file = Some(file);
        self.log_file_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), append = self.append_mode, "log file opened");
        Ok(())
    }

    /// Flushes and closes the log file. A no-op if none is open.
    pub fn close_log_file(&mut self) {
        self.release_file();
        self.log_file_path = None;
    }

    /// Returns the configured log file path.
    #[must_use]
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    /// Returns true if a log file is currently open.
    #[must_use]
    pub const fn has_log_file(&self) -> bool {
        self.log_file.is_some()
    }

    fn release_file(&mut self) {
        let Some(mut file) = self.log_file.take() else {
            return;
        };
        if let Err(source) = file.flush() {
            let target = self.log_file_path.clone().unwrap_or_default();
            self.report(&Error::io(&target, source));
        }
        drop(file);
        tracing::debug!(path = ?self.log_file_path, "log file closed");
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Writes a colorized line to the console, terminated by a reset.
    pub fn write_to_console(&mut self, fields: &[(&str, &str)]) {
        let line = format(&self.console_format, fields, Some(&self.colors));
        let result = writeln!(self.console, "{line}{}", Color::RESET).and_then(|()| self.console.flush());
        if let Err(source) = result {
            self.report(&Error::console(source));
        }
    }

    /// Writes an uncolored line to the log file and flushes it.
    ///
    /// A no-op if no file is open.
    pub fn write_to_file(&mut self, fields: &[(&str, &str)]) {
        let Some(file) = self.log_file.as_mut() else {
            return;
        };
        let mut line = format(&self.file_format, fields, None);
        line.push('\n');
        let result = file.write_all(line.as_bytes()).and_then(|()| file.flush());
        if let Err(source) = result {
            let target = self.log_file_path.clone().unwrap_or_default();
            self.report(&Error::io(&target, source));
        }
    }

    /// Writes to the console, then to the file.
    pub fn write(&mut self, fields: &[(&str, &str)]) {
        self.write_to_console(fields);
        self.write_to_file(fields);
    }

    /// Builds a record stamped with the current time and writes it.
    ///
    /// Debug records are dropped unless debug mode is on.
    pub fn emit(&mut self, level: Level, context: &Context, message: &str) {
        if level == Level::Debug && !self.debug_mode {
            return;
        }
        let record = Record::new(
            level,
            context.clone(),
            message,
            date::format_now(&self.date_format),
        );
        self.write(&record.fields());
    }

    /// Flushes the console and the log file, reporting failures.
    pub fn flush(&mut self) {
        if let Err(source) = self.console.flush() {
            self.report(&Error::console(source));
        }
        if let Some(file) = self.log_file.as_mut() {
            // sync_all so the line survives an immediate process exit
            if let Err(source) = file.flush().and_then(|()| file.sync_all()) {
                let target = self.log_file_path.clone().unwrap_or_default();
                self.report(&Error::io(&target, source));
            }
        }
    }

    fn report(&self, err: &Error) {
        tracing::warn!(error = %err, "log write failed");
        (self.error_handler)(err);
    }

    // =========================================================================
    // Configuration documents
    // =========================================================================

    /// Applies a decoded configuration document.
    ///
    /// Absent fields are left alone; colors overlay the current table. A
    /// successful load is logged at INFO, and when debug mode is on
    /// afterwards the loaded settings follow at DEBUG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for a malformed color (nothing is
    /// applied), or [`Error::Io`] if the document's file cannot be opened
    /// (everything else is applied).
    pub fn load_from_document(&mut self, doc: &ConfigDocument) -> Result<()> {
        let mut colors = self.colors.clone();
        if let Some(overlay) = &doc.colors {
            colors.overlay_hex(overlay)?;
        }
        self.colors = colors;

        if let Some(formats) = &doc.formats {
            if let Some(date) = &formats.date {
                self.date_format.clone_from(date);
            }
            if let Some(console) = &formats.console {
                self.console_format.clone_from(console);
            }
            if let Some(file) = &formats.file {
                self.file_format.clone_from(file);
            }
        }
        if let Some(debug) = doc.debug {
            self.set_debug_mode(debug);
        }
        if let Some(append) = doc.append {
            self.set_append_mode(append);
        }
        if let Some(path) = &doc.file {
            self.open_log_file(path)?;
        }

        tracing::debug!(?doc, "configuration loaded");
        let loaded = format!("Logger configuration loaded, log file: {}", self.log_file_label());
        self.emit(Level::Info, &Context::new(LOAD_CONTEXT), &loaded);
        if self.debug_mode {
            self.describe_settings();
        }
        Ok(())
    }

    /// Decodes and applies a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed JSON, otherwise as
    /// [`load_from_document`](Self::load_from_document).
    pub fn load_from_json(&mut self, bytes: &[u8]) -> Result<()> {
        let doc = ConfigDocument::from_json(bytes)?;
        self.load_from_document(&doc)
    }

    /// Decodes and applies a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML, otherwise as
    /// [`load_from_document`](Self::load_from_document).
    pub fn load_from_toml(&mut self, text: &str) -> Result<()> {
        let doc = ConfigDocument::from_toml(text)?;
        self.load_from_document(&doc)
    }

    /// Reads a `.json` or `.toml` configuration file and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::ConfigParse`]
    /// for an unsupported extension or malformed content, otherwise as
    /// [`load_from_document`](Self::load_from_document).
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::io(path, source))?;
        let doc = ConfigDocument::from_bytes_for(path, &bytes)?;
        self.load_from_document(&doc)
    }

    fn log_file_label(&self) -> String {
        self.log_file_path
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string())
    }

    fn describe_settings(&mut self) {
        let context = Context::new(LOAD_CONTEXT);
        let file = self.log_file_label();
        let lines = [
            format!("Date format: '{}'", self.date_format),
            format!("Console format: '{}'", self.console_format),
            format!("File format: '{}'", self.file_format),
            format!("Debug mode: {}", self.debug_mode),
            format!("Append mode: {}", self.append_mode),
            format!("Log file: {file}"),
            format!("Colors: {}", self.colors.describe()),
        ];
        for line in &lines {
            self.emit(Level::Debug, &context, line);
        }
    }
}

fn open_file(path: &Path, append: bool) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}
