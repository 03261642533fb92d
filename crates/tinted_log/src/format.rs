//! Template substitution.
//!
//! Templates contain `{field}` placeholders that are replaced with record
//! field values. Placeholders with no matching field are left verbatim.
//!
//! ```rust
//! use tinted_log::format::format;
//!
//! let line = format("[{type}]: {message}", &[("type", "INFO"), ("message", "hi")], None);
//! assert_eq!(line, "[INFO]: hi");
//! ```

use crate::colors::ColorTable;

/// Standard field names of a log record.
pub mod keys {
    /// Key for the level name.
    pub const TYPE: &str = "type";
    /// Key for the caller context.
    pub const CONTEXT: &str = "context";
    /// Key for the message.
    pub const MESSAGE: &str = "message";
    /// Key for the formatted timestamp.
    pub const DATE: &str = "date";
}

/// Substitutes `fields` into `template`.
///
/// With `colors`, every substituted value is wrapped in its resolved color
/// (see [`ColorTable::resolve`]) and a reset. Values are inserted as-is and
/// never re-scanned for placeholders. If a name appears twice in `fields`
/// the first pair wins. No trailing reset is appended.
#[must_use]
pub fn format(template: &str, fields: &[(&str, &str)], colors: Option<&ColorTable>) -> String {
    let mut out = String::with_capacity(template.len() + 32 * fields.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match fields.iter().find(|(key, _)| *key == name) {
            Some((key, value)) => {
                push_value(&mut out, key, value, colors);
                rest = &after[close + 1..];
            }
            None => {
                // Not a field: keep the brace and rescan after it.
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn push_value(out: &mut String, key: &str, value: &str, colors: Option<&ColorTable>) {
    match colors {
        Some(table) => out.push_str(&table.resolve(key, value).paint(value)),
        None => out.push_str(value),
    }
}
