//! The per-call log record.

use crate::context::Context;
use crate::format::keys;
use crate::level::Level;

/// One log call, ready to be formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Severity.
    pub level: Level,
    /// Caller identity.
    pub context: Context,
    /// Message text.
    pub message: String,
    /// Timestamp, already formatted.
    pub date: String,
}

impl Record {
    /// Creates a record.
    pub fn new(
        level: Level,
        context: Context,
        message: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            level,
            context,
            message: message.into(),
            date: date.into(),
        }
    }

    /// The record as template fields: `type`, `context`, `message`, `date`.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            (keys::TYPE, self.level.as_str()),
            (keys::CONTEXT, self.context.as_str()),
            (keys::MESSAGE, &self.message),
            (keys::DATE, &self.date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format;

    #[test]
    fn test_fields_feed_templates() {
        let record = Record::new(Level::Warning, Context::new("Pool.drop"), "leak", "2024-01-01");
        let line = format("{date} [{type}][{context}]: {message}", &record.fields(), None);
        assert_eq!(line, "2024-01-01 [WARNING][Pool.drop]: leak");
    }
}
