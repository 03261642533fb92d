//! Color values and their terminal escape sequences.
//!
//! Two kinds of color live behind [`Color`]:
//! - RGB colors, rendered as `ESC[38;2;R;G;Bm`
//! - Style escapes (reset, bold, ...) that carry a fixed raw sequence
//!
//! A default-constructed color renders as the reset sequence.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The SGR reset sequence.
pub const RESET_SEQUENCE: &str = "\x1b[0m";

/// Error returned when a color string is not `#RRGGBB`.
///
/// # Example
///
/// ```rust
/// use tint::{Color, ParseColorError};
///
/// let err = Color::from_hex("FF0000").unwrap_err();
/// assert!(matches!(err, ParseColorError::InvalidFormat { .. }));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// The input is not a `#` followed by six hex digits.
    #[error("invalid color {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl ParseColorError {
    fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
enum Kind {
    #[default]
    Unset,
    Rgb(i32, i32, i32),
    Raw(&'static str),
}

/// A terminal color: an RGB triple or a fixed style escape.
///
/// Channel values passed to [`Color::from_rgb`] are kept as given, without
/// clamping; [`Color::escape`] prints them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    kind: Kind,
}

impl Color {
    /// Resets all colors and styles.
    pub const RESET: Self = Self::raw(RESET_SEQUENCE);
    /// `#000000`
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    /// `#FF0000`
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    /// `#00FF00`
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    /// `#0000FF`
    pub const BLUE: Self = Self::from_rgb(0, 0, 255);
    /// `#FFFF00`
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    /// `#FF00FF`
    pub const MAGENTA: Self = Self::from_rgb(255, 0, 255);
    /// `#00FFFF`
    pub const CYAN: Self = Self::from_rgb(0, 255, 255);
    /// `#FFFFFF`
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// `#808080`
    pub const GRAY: Self = Self::from_rgb(128, 128, 128);
    /// Bold text.
    pub const BOLD: Self = Self::raw("\x1b[1m");
    /// Italic text.
    pub const ITALIC: Self = Self::raw("\x1b[3m");
    /// Underlined text.
    pub const UNDERLINE: Self = Self::raw("\x1b[4m");
    /// Struck-through text.
    pub const STRIKETHROUGH: Self = Self::raw("\x1b[9m");

    const NAMED: [(&'static str, Self); 14] = [
        ("reset", Self::RESET),
        ("black", Self::BLACK),
        ("red", Self::RED),
        ("green", Self::GREEN),
        ("blue", Self::BLUE),
        ("yellow", Self::YELLOW),
        ("magenta", Self::MAGENTA),
        ("cyan", Self::CYAN),
        ("white", Self::WHITE),
        ("gray", Self::GRAY),
        ("bold", Self::BOLD),
        ("italic", Self::ITALIC),
        ("underline", Self::UNDERLINE),
        ("strikethrough", Self::STRIKETHROUGH),
    ];

    /// Creates a color from red, green and blue channels.
    pub const fn from_rgb(red: i32, green: i32, blue: i32) -> Self {
        Self {
            kind: Kind::Rgb(red, green, blue),
        }
    }

    /// Creates a color from a packed `0xRRGGBB` integer.
    ///
    /// Bits above the low 24 are ignored.
    pub const fn from_packed(hexa: u32) -> Self {
        Self::from_rgb(
            ((hexa >> 16) & 0xFF) as i32,
            ((hexa >> 8) & 0xFF) as i32,
            (hexa & 0xFF) as i32,
        )
    }

    /// Creates a style-only color backed by a fixed escape sequence.
    pub const fn raw(sequence: &'static str) -> Self {
        Self {
            kind: Kind::Raw(sequence),
        }
    }

    /// Parses a `#RRGGBB` string (hex digits in either case).
    ///
    /// # Errors
    ///
    /// Returns [`ParseColorError::InvalidFormat`] when the input is not
    /// exactly seven characters, lacks the leading `#`, or contains
    /// non-hex digits.
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        if s.len() != 7 {
            return Err(ParseColorError::invalid(s, "expected 7 characters (#RRGGBB)"));
        }
        let Some(digits) = s.strip_prefix('#') else {
            return Err(ParseColorError::invalid(s, "missing leading '#'"));
        };
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError::invalid(s, "non-hex digit"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(i32::from)
                .map_err(|_| ParseColorError::invalid(s, "non-hex digit"))
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Looks up one of the predefined colors by name, ignoring case.
    ///
    /// ```rust
    /// use tint::Color;
    ///
    /// assert_eq!(Color::by_name("Magenta"), Some(Color::MAGENTA));
    /// assert_eq!(Color::by_name("bold"), Some(Color::BOLD));
    /// assert_eq!(Color::by_name("mauve"), None);
    /// ```
    pub fn by_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    /// Returns the RGB triple, or `None` for style-only colors.
    pub const fn rgb(&self) -> Option<(i32, i32, i32)> {
        match self.kind {
            Kind::Rgb(r, g, b) => Some((r, g, b)),
            Kind::Raw(_) | Kind::Unset => None,
        }
    }

    /// Returns true if this color is a style escape rather than an RGB color.
    pub const fn is_style(&self) -> bool {
        !matches!(self.kind, Kind::Rgb(..))
    }

    /// Returns the terminal escape sequence for this color.
    ///
    /// Never empty: an unset color yields [`RESET_SEQUENCE`].
    pub fn escape(&self) -> Cow<'static, str> {
        match self.kind {
            Kind::Rgb(r, g, b) => Cow::Owned(format!("\x1b[38;2;{r};{g};{b}m")),
            Kind::Raw(seq) => Cow::Borrowed(seq),
            Kind::Unset => Cow::Borrowed(RESET_SEQUENCE),
        }
    }

    /// Returns `#RRGGBB` (upper-case) for RGB colors.
    ///
    /// Each channel contributes the two hex digits of its low byte.
    pub fn hex(&self) -> Option<String> {
        self.rgb()
            .map(|(r, g, b)| format!("#{:02X}{:02X}{:02X}", r & 0xFF, g & 0xFF, b & 0xFF))
    }

    /// Wraps `text` in this color's escape and a trailing reset.
    pub fn paint(&self, text: &str) -> String {
        let escape = self.escape();
        let mut out = String::with_capacity(escape.len() + text.len() + RESET_SEQUENCE.len());
        out.push_str(&escape);
        out.push_str(text);
        out.push_str(RESET_SEQUENCE);
        out
    }

    /// Human-readable label: the hex form for RGB colors, the style name
    /// for predefined style escapes.
    pub fn describe(&self) -> String {
        if let Some(hex) = self.hex() {
            return hex;
        }
        let escape = self.escape();
        Self::NAMED
            .iter()
            .find(|(_, c)| c.is_style() && c.escape() == escape)
            .map_or_else(|| format!("{:?}", escape), |(name, _)| (*name).to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escape())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&str> for Color {
    type Error = ParseColorError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_hex(s)
    }
}

impl From<u32> for Color {
    fn from(hexa: u32) -> Self {
        Self::from_packed(hexa)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.describe())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ColorVisitor)
    }
}

struct ColorVisitor;

impl Visitor<'_> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a #RRGGBB string, a color name, or a packed 0xRRGGBB integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.starts_with('#') {
            return Color::from_hex(v).map_err(E::custom);
        }
        Color::by_name(v).ok_or_else(|| E::custom(format!("unknown color name {v:?}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let packed = u32::try_from(v)
            .ok()
            .filter(|n| *n <= 0x00FF_FFFF)
            .ok_or_else(|| E::custom(format!("packed color must be 0..=0xFFFFFF, got {v}")))?;
        Ok(Color::from_packed(packed))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let v = u64::try_from(v)
            .map_err(|_| E::custom(format!("packed color must be 0..=0xFFFFFF, got {v}")))?;
        self.visit_u64(v)
    }
}
