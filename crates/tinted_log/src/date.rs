//! Date patterns.
//!
//! Date formats are written in the familiar `yyyy-MM-dd HH:mm:ss` pattern
//! language and translated to `chrono` strftime items. A pattern that
//! already contains `%` is used as a strftime string directly.
//!
//! | Letters | Meaning | strftime |
//! |---------|---------|----------|
//! | `yyyy` / `yy` | year | `%Y` / `%y` |
//! | `MMMM` / `MMM` / `MM` / `M` | month | `%B` / `%b` / `%m` / `%-m` |
//! | `dd` / `d` | day of month | `%d` / `%-d` |
//! | `HH` / `H` | hour (0-23) | `%H` / `%-H` |
//! | `hh` / `h` | hour (1-12) | `%I` / `%-I` |
//! | `mm` / `m` | minute | `%M` / `%-M` |
//! | `ss` / `s` | second | `%S` / `%-S` |
//! | `S`.. | fraction | `%3f` / `%6f` / `%9f` |
//! | `a` | AM/PM | `%p` |
//! | `EEEE` / `EEE` | weekday | `%A` / `%a` |
//! | `z` / `Z` | zone | `%Z` / `%z` |
//!
//! Text between single quotes is literal; `''` is a quote.

use std::fmt::{Display, Write};

use chrono::{DateTime, Local, TimeZone};

/// Translates a date pattern into a strftime string.
///
/// ```rust
/// use tinted_log::date::to_strftime;
///
/// assert_eq!(to_strftime("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
/// assert_eq!(to_strftime("%H:%M"), "%H:%M");
/// ```
#[must_use]
pub fn to_strftime(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is an escaped quote, otherwise a quoted literal run
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }
        i += run;

        let item = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', 1..=3) => "%3f",
            ('S', 4..=6) => "%6f",
            ('S', _) => "%9f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('z', _) => "%Z",
            ('Z', _) => "%z",
            _ => {
                for _ in 0..run {
                    out.push(c);
                }
                continue;
            }
        };
        out.push_str(item);
    }

    out
}

/// Formats `datetime` with a date pattern.
///
/// A pattern that chrono cannot render is returned unformatted instead of
/// failing the log call.
pub fn format_datetime<Tz>(pattern: &str, datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let strftime = to_strftime(pattern);
    let mut out = String::new();
    if write!(out, "{}", datetime.format(&strftime)).is_err() {
        return pattern.to_string();
    }
    out
}

/// Formats the current local time with a date pattern.
#[must_use]
pub fn format_now(pattern: &str) -> String {
    format_datetime(pattern, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 4).unwrap()
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(to_strftime("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(
            format_datetime("yyyy-MM-dd HH:mm:ss", &fixed()),
            "2024-03-07 09:05:04"
        );
    }

    #[test]
    fn test_short_fields() {
        assert_eq!(format_datetime("d/M/yy H:m:s", &fixed()), "7/3/24 9:5:4");
    }

    #[test]
    fn test_names_and_fraction() {
        assert_eq!(format_datetime("EEE, d MMM yyyy", &fixed()), "Thu, 7 Mar 2024");
        assert_eq!(format_datetime("MMMM", &fixed()), "March");
        assert_eq!(format_datetime("ss.SSS", &fixed()), "04.000");
        assert_eq!(format_datetime("hh a", &fixed()), "09 AM");
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(
            format_datetime("yyyy'T'HH 'o''clock'", &fixed()),
            "2024T09 o'clock"
        );
        assert_eq!(format_datetime("''HH", &fixed()), "'09");
    }

    #[test]
    fn test_unknown_letters_are_literal() {
        assert_eq!(to_strftime("QQ yyyy"), "QQ %Y");
    }

    #[test]
    fn test_strftime_passthrough() {
        assert_eq!(format_datetime("%Y/%m/%d", &fixed()), "2024/03/07");
    }

    #[test]
    fn test_invalid_strftime_does_not_panic() {
        assert_eq!(format_datetime("%Q broken", &fixed()), "%Q broken");
    }

    #[test]
    fn test_format_now_is_non_empty() {
        assert_eq!(format_now("yyyy").len(), 4);
    }
}
