#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

//! # Tint
//!
//! Terminal colors for log output.
//!
//! A [`Color`] is either a 24-bit RGB triple, rendered as an ANSI true-color
//! foreground escape, or a fixed text-style escape (reset, bold, italic,
//! underline, strikethrough) that has no RGB meaning.
//!
//! ## Example
//!
//! ```rust
//! use tint::Color;
//!
//! let accent = Color::from_hex("#00AAFF").unwrap();
//! assert_eq!(accent.escape(), "\x1b[38;2;0;170;255m");
//! assert_eq!(accent.hex().as_deref(), Some("#00AAFF"));
//!
//! let shout = Color::RED.paint("fire");
//! assert!(shout.ends_with(&*Color::RESET.escape()));
//! ```

mod color;

pub use color::{Color, ParseColorError, RESET_SEQUENCE};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{Color, ParseColorError, RESET_SEQUENCE};
}
