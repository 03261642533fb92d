//! End-to-end tests for the logger facade: console capture, file output,
//! configuration documents and caller context.

use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tinted_log::prelude::*;

/// A console writer tests can read back.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured() -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let logger = Logger::new();
    logger.set_console_writer(Box::new(buffer.clone()));
    (logger, buffer)
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug)]
struct Timeout {
    after_ms: u64,
}

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timed out after {}ms", self.after_ms)
    }
}

impl std::error::Error for Timeout {}

#[test]
fn console_line_per_call_with_reset() {
    let (logger, buffer) = captured();
    tinted_log::info!(logger, "hello {}", "world");
    let out = buffer.contents();
    assert_eq!(out.lines().count(), 1);
    assert!(out.ends_with("\x1b[0m\n"));
    assert_eq!(
        strip_ansi(&out),
        "[INFO][logger_tests.console_line_per_call_with_reset]: hello world\n"
    );
}

#[test]
fn file_lines_are_plain_and_dated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let (logger, _buffer) = captured();
    logger.open_log_file(&path).unwrap();

    tinted_log::warning!(logger, "low disk");
    tinted_log::error!(logger, "no disk");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains('\x1b'));
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" [WARNING][logger_tests.file_lines_are_plain_and_dated]: low disk"));
    assert!(lines[1].ends_with(" [ERROR][logger_tests.file_lines_are_plain_and_dated]: no disk"));
    // "yyyy-MM-dd HH:mm:ss " prefix
    assert_eq!(lines[0].find(" ["), Some(19));
}

#[test]
fn debug_respects_debug_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (logger, buffer) = captured();
    logger.open_log_file(&path).unwrap();

    logger.debug("hidden");
    tinted_log::debug!(logger, "hidden too");
    assert!(buffer.contents().is_empty());
    assert!(fs::read_to_string(&path).unwrap().is_empty());

    logger.set_debug_mode(true);
    logger.debug("visible");
    let console = strip_ansi(&buffer.contents());
    assert_eq!(console.lines().count(), 1);
    assert!(console.starts_with("[DEBUG]"));
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn error_with_renders_trace_tree() {
    let (logger, buffer) = captured();
    logger.configure(|config| config.set_console_format("{message}"));
    logger.error_with("request failed", &Timeout { after_ms: 250 });

    let out = strip_ansi(&buffer.contents());
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("request failed"));
    assert_eq!(lines.next(), Some("    --> logger_tests::Timeout: timed out after 250ms"));
    let frames: Vec<_> = lines.collect();
    if let Some((last, rest)) = frames.split_last() {
        assert!(last.starts_with("        └── "));
        assert!(rest.iter().all(|l| l.starts_with("        ├── ")));
    }
}

#[test]
fn error_from_leads_with_caught_message() {
    let (logger, buffer) = captured();
    logger.configure(|config| config.set_console_format("{message}"));
    logger.error_from(&Timeout { after_ms: 9 });

    let out = strip_ansi(&buffer.contents());
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], CAUGHT_ERROR_MESSAGE);
    assert_eq!(lines[1], "    --> logger_tests::Timeout: timed out after 9ms");
}

#[test]
fn explicit_trace_rendering() {
    let trace = ErrorTrace::new("app::ParseError", "bad token", ["app::lex", "app::parse", "app::main"]);
    let rendered = trace.to_string();
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines[0], "    --> app::ParseError: bad token");
    assert_eq!(lines[1], "        ├── app::lex");
    assert_eq!(lines[2], "        ├── app::parse");
    assert_eq!(lines[3], "        └── app::main");
}

#[test]
fn method_context_is_not_the_logger() {
    let (logger, buffer) = captured();
    logger.configure(|config| config.set_console_format("{context}"));
    logger.log("x");
    let context = strip_ansi(&buffer.contents());
    let context = context.trim_end();
    assert!(!context.is_empty());
    assert!(!context.starts_with("Logger."), "got {context}");
    assert!(!context.starts_with("Context."), "got {context}");
}

#[test]
fn append_false_truncates_each_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncate.log");
    let (logger, _buffer) = captured();
    logger.open_log_file(&path).unwrap();

    logger.set_append_mode(false);
    logger.log("first");
    logger.set_append_mode(false);
    logger.log("second");

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("second"));
}

#[test]
fn write_to_file_without_open_is_noop() {
    let mut config = LogConfig::new();
    config.set_console_writer(Box::new(io::sink()));
    config.write_to_file(&[("message", "nowhere")]);
    assert!(!config.has_log_file());
}

#[test]
fn json_document_configures_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("doc.log");
    let doc = serde_json_doc(&path);

    let (logger, buffer) = captured();
    logger.load_from_json(doc.as_bytes()).unwrap();
    logger.log("configured");

    let console = strip_ansi(&buffer.contents());
    assert!(console.ends_with("INFO :: configured\n"));
    let file = fs::read_to_string(&path).unwrap();
    let file_lines: Vec<_> = file.lines().collect();
    assert_eq!(file_lines.len(), 2);
    assert!(file_lines[0].starts_with("INFO "));
    assert!(file_lines[0].ends_with(&format!(
        "Logger configuration loaded, log file: {}",
        path.display()
    )));
    assert!(file_lines[1].ends_with(" configured"));

    logger.configure(|config| {
        assert_eq!(config.date_format(), "HH:mm");
        assert_eq!(config.colors().get("INFO"), Some(Color::from_packed(0x11_22_33)));
        assert_eq!(config.colors().get("ERROR"), Some(Color::from_packed(0xFF_22_22)));
        assert!(!config.is_append_mode());
    });
}

fn serde_json_doc(path: &std::path::Path) -> String {
    format!(
        r##"{{
            "formats": {{
                "date": "HH:mm",
                "console": "{{type}} :: {{message}}",
                "file": "{{type}} {{date}} {{message}}"
            }},
            "colors": {{"INFO": "#112233"}},
            "append": false,
            "file": {}
        }}"##,
        quote(&path.display().to_string())
    )
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[test]
fn debug_document_logs_settings() {
    let (logger, buffer) = captured();
    logger.load_from_json(br#"{"debug": true}"#).unwrap();
    let out = strip_ansi(&buffer.contents());
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some("[INFO][LogConfig.load_from_document]: Logger configuration loaded, log file: none")
    );
    assert!(lines.all(|l| l.starts_with("[DEBUG][LogConfig.load_from_document]: ")));
    assert!(out.contains("Console format: '[{type}][{context}]: {message}'"));
    assert!(out.contains("INFO='#00AAFF'"));
    assert!(out.contains("message='reset'"));
}

#[test]
fn toml_document() {
    let (logger, _buffer) = captured();
    logger
        .load_from_toml("debug = false\nappend = true\n[colors]\nWARNING = \"#abcdef\"\n")
        .unwrap();
    logger.configure(|config| {
        assert_eq!(
            config.colors().get("WARNING").and_then(|c| c.hex()).as_deref(),
            Some("#ABCDEF")
        );
    });
}

#[test]
fn record_critical_flushes_file_before_returning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crit.log");
    let (logger, _buffer) = captured();
    logger.open_log_file(&path).unwrap();

    let code = logger.record_critical(&Context::new("Main.run"), "halt", 3);
    assert_eq!(code, 3);
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[CRITICAL][Main.run]: halt\n"));
    assert!(contents.ends_with("\n    --> Critical error code: 3\n"));
}

#[test]
fn error_exit_codes_are_stable() {
    let a = ErrorTrace::of(&Timeout { after_ms: 5 }).exit_code();
    let b = ErrorTrace::of(&Timeout { after_ms: 5 }).exit_code();
    assert_eq!(a, b);
    assert_ne!(a, 0);
}
