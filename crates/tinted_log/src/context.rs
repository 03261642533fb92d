//! Caller context: the `Type.method` shown in the `{context}` field.
//!
//! Context comes from one of three places:
//! - an explicit string ([`Context::new`])
//! - the logging macros, which name the enclosing function at compile time
//! - a stack walk ([`Context::capture`]), used by the [`Logger`] methods
//!
//! # Performance Warning
//!
//! [`Context::capture`] takes a full backtrace and resolves symbols on every
//! call (~100μs). Prefer the macros on hot paths.
//!
//! [`Logger`]: crate::Logger

use std::fmt;

use backtrace::Backtrace;

const UNKNOWN: &str = "unknown";

/// Name of the code that issued a log call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context(String);

impl Default for Context {
    fn default() -> Self {
        Self::unknown()
    }
}

impl Context {
    /// Creates a context from an explicit name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The placeholder used when no caller could be found.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    /// Builds a context from a Rust item path such as
    /// `app::server::Listener::accept`, keeping the last two segments:
    /// `Listener.accept`.
    ///
    /// Closure segments, symbol hashes and generic arguments are dropped.
    ///
    /// ```rust
    /// use tinted_log::Context;
    ///
    /// assert_eq!(Context::from_path("app::net::Conn::read").as_str(), "Conn.read");
    /// assert_eq!(Context::from_path("main").as_str(), "main");
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = split_path(path)
            .into_iter()
            .filter(|s| !s.is_empty() && !s.starts_with("{{") && !is_symbol_hash(s))
            .collect();

        match segments.as_slice() {
            [] => Self::unknown(),
            [only] => Self::new(*only),
            [.., owner, item] => Self::new(format!("{owner}.{item}")),
        }
    }

    /// Finds the first caller outside this crate by walking the stack.
    ///
    /// Returns [`Context::unknown`] when symbols are unavailable.
    #[must_use]
    pub fn capture() -> Self {
        external_frames()
            .into_iter()
            .next()
            .map_or_else(Self::unknown, |frame| Self::from_path(&frame.function))
    }

    /// Returns the context as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Context {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Context {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Splits on `::` outside of `<...>` and strips generic arguments.
fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);

    segments
        .into_iter()
        .map(|s| {
            // `<app::Foo as Trait>` → `Foo`, `Vec<T>` → `Vec`
            if let Some(inner) = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                let ty = inner.split(" as ").next().unwrap_or(inner);
                return ty.rsplit("::").next().unwrap_or(ty);
            }
            s.split('<').next().unwrap_or(s)
        })
        .collect()
}

/// Mangled symbol hashes look like `h0123456789abcdef`.
fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// A resolved stack frame outside this crate.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub(crate) function: String,
    pub(crate) file: Option<String>,
    pub(crate) line: Option<u32>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})"),
            (Some(file), None) => write!(f, " ({file})"),
            _ => Ok(()),
        }
    }
}

fn is_internal(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    function.starts_with("tinted_log::") || function.starts_with("backtrace::")
}

/// Captures the stack and returns the frames above this crate's own,
/// innermost first, stopping at the runtime entry point.
///
/// # Performance Warning
///
/// Resolves every symbol; expect ~100μs or more per call.
pub(crate) fn external_frames() -> Vec<Frame> {
    let bt = Backtrace::new();
    let mut frames = Vec::new();
    let mut seen_internal = false;

    for frame in bt.frames() {
        for symbol in frame.symbols() {
            let Some(name) = symbol.name() else {
                continue;
            };
            // {:#} omits the trailing hash
            let function = format!("{name:#}");

            if is_internal(&function) {
                seen_internal = true;
                continue;
            }
            if !seen_internal {
                continue;
            }
            if function.contains("__rust_begin_short_backtrace") {
                return frames;
            }

            frames.push(Frame {
                function,
                file: symbol
                    .filename()
                    .and_then(|p| p.to_str())
                    .map(str::to_string),
                line: symbol.lineno(),
            });
        }
    }

    frames
}

/// Expands to the path of the enclosing function, e.g.
/// `app::server::Listener::accept`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        name.strip_suffix("::__here").unwrap_or(name)
    }};
}

/// Expands to the [`Context`] of the enclosing function.
///
/// ```rust
/// mod billing {
///     pub struct Invoice;
///     impl Invoice {
///         pub fn total() -> tinted_log::Context {
///             tinted_log::context!()
///         }
///     }
/// }
///
/// assert_eq!(billing::Invoice::total().as_str(), "Invoice.total");
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::from_path($crate::__function_path!())
    };
}
