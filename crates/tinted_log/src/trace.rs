//! Error traces appended to error and critical messages.
//!
//! A trace renders as an arrow-marked annotation with the error's type and
//! message, a tree of stack frames, and the error's `source()` chain:
//!
//! ```text
//!     --> std::io::error::Error: disk full
//!         ├── app::store::Store::flush (src/store.rs:42)
//!         └── app::main (src/main.rs:9)
//!     --> Caused by: no space left on device
//! ```

use std::collections::hash_map::DefaultHasher;
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::context::external_frames;

/// Prefix of an annotation line appended to a log message.
pub const ANNOTATION: &str = "    --> ";

const FRAME_INDENT: &str = "        ";

/// A rendered description of an error and where it was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTrace {
    type_name: String,
    message: String,
    frames: Vec<String>,
    causes: Vec<String>,
}

impl ErrorTrace {
    /// Creates a trace from explicit parts.
    pub fn new<I, S>(type_name: impl Into<String>, message: impl Into<String>, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            frames: frames.into_iter().map(Into::into).collect(),
            causes: Vec::new(),
        }
    }

    /// Describes `err`: its type, `Display` message and source chain, with
    /// the frames of the code reporting it (outside this crate).
    ///
    /// # Performance Warning
    ///
    /// Captures and resolves a backtrace.
    #[must_use]
    pub fn of<E>(err: &E) -> Self
    where
        E: StdError + 'static,
    {
        let mut trace = Self::new(
            std::any::type_name::<E>(),
            err.to_string(),
            external_frames().iter().map(ToString::to_string),
        );
        trace.causes = sources(err);
        trace
    }

    /// Adds `source()` messages, outermost first.
    #[must_use]
    pub fn with_causes<I, S>(mut self, causes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.causes.extend(causes.into_iter().map(Into::into));
        self
    }

    /// The error's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The error's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The captured frames, innermost first.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Deterministic, non-zero process exit code for this error.
    ///
    /// Derived only from the type name and message, so the same error
    /// always maps to the same code (in `1..=255`).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        // DefaultHasher::new() uses fixed keys
        let mut hasher = DefaultHasher::new();
        self.type_name.hash(&mut hasher);
        self.message.hash(&mut hasher);
        i32::try_from(hasher.finish() % 255).unwrap_or(0) + 1
    }
}

impl fmt::Display for ErrorTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ANNOTATION}{}: {}", self.type_name, self.message)?;
        let last = self.frames.len().saturating_sub(1);
        for (i, frame) in self.frames.iter().enumerate() {
            let branch = if i == last { "└──" } else { "├──" };
            write!(f, "\n{FRAME_INDENT}{branch} {frame}")?;
        }
        for cause in &self.causes {
            write!(f, "\n{ANNOTATION}Caused by: {cause}")?;
        }
        Ok(())
    }
}

fn sources(err: &dyn StdError) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}
