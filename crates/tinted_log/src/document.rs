//! The configuration document.
//!
//! Every field is optional; absent fields leave the current configuration
//! alone.
//!
//! ```json
//! {
//!   "formats": {
//!     "date": "yyyy-MM-dd HH:mm:ss",
//!     "console": "[{type}][{context}]: {message}",
//!     "file": "{date} [{type}][{context}]: {message}"
//!   },
//!   "colors": { "INFO": "#00AAFF", "context": "#AAAAAA" },
//!   "debug": false,
//!   "append": true,
//!   "file": "logs/app.log"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigParseError;

/// Template overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Formats {
    /// Date pattern for the `{date}` field.
    pub date: Option<String>,
    /// Console line template.
    pub console: Option<String>,
    /// File line template.
    pub file: Option<String>,
}

/// A decoded configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDocument {
    /// Template overrides.
    pub formats: Option<Formats>,
    /// Color overlay: field or level name to `#RRGGBB`.
    pub colors: Option<BTreeMap<String, String>>,
    /// Debug mode.
    pub debug: Option<bool>,
    /// Append (true) or truncate (false) the log file when opening it.
    pub append: Option<bool>,
    /// Log file to open.
    pub file: Option<PathBuf>,
}

impl ConfigDocument {
    /// Decodes a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError::Json`] if the bytes are not a document of
    /// the expected shape.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decodes a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError::Toml`] if the text is not a document of
    /// the expected shape.
    pub fn from_toml(text: &str) -> Result<Self, ConfigParseError> {
        Ok(toml::from_str(text)?)
    }

    /// Decodes a document, picking the format from the path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError::UnsupportedFormat`] for extensions other
    /// than `json` and `toml`, or the decode error.
    pub fn from_bytes_for(path: &Path, bytes: &[u8]) -> Result<Self, ConfigParseError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(bytes),
            Some("toml") => Self::from_toml(std::str::from_utf8(bytes)?),
            Some(ext) => Err(ConfigParseError::UnsupportedFormat(ext.into())),
            None => Err(ConfigParseError::UnsupportedFormat("unknown".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        assert_eq!(ConfigDocument::from_json(b"{}").unwrap(), ConfigDocument::default());
    }

    #[test]
    fn test_debug_only() {
        let doc = ConfigDocument::from_json(br#"{"debug": true}"#).unwrap();
        assert_eq!(doc.debug, Some(true));
        assert!(doc.formats.is_none());
        assert!(doc.colors.is_none());
        assert!(doc.append.is_none());
        assert!(doc.file.is_none());
    }

    #[test]
    fn test_full_json() {
        let doc = ConfigDocument::from_json(
            br##"{
                "formats": {"date": "HH:mm", "console": "{message}"},
                "colors": {"INFO": "#010203"},
                "debug": false,
                "append": false,
                "file": "out.log"
            }"##,
        )
        .unwrap();
        let formats = doc.formats.unwrap();
        assert_eq!(formats.date.as_deref(), Some("HH:mm"));
        assert_eq!(formats.console.as_deref(), Some("{message}"));
        assert!(formats.file.is_none());
        assert_eq!(doc.colors.unwrap()["INFO"], "#010203");
        assert_eq!(doc.append, Some(false));
        assert_eq!(doc.file.as_deref(), Some(Path::new("out.log")));
    }

    #[test]
    fn test_toml() {
        let doc = ConfigDocument::from_toml(
            r##"
debug = true
file = "app.log"

[formats]
file = "{date} {message}"

[colors]
ERROR = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(doc.debug, Some(true));
        assert_eq!(doc.formats.unwrap().file.as_deref(), Some("{date} {message}"));
        assert_eq!(doc.colors.unwrap()["ERROR"], "#FF0000");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            ConfigDocument::from_json(b"{not json"),
            Err(ConfigParseError::Json(_))
        ));
        assert!(ConfigDocument::from_json(br#"{"debug": "yes"}"#).is_err());
        assert!(ConfigDocument::from_json(br#"{"colour": {}}"#).is_err());
        assert!(ConfigDocument::from_json(b"[]").is_err());
        assert!(matches!(
            ConfigDocument::from_toml("debug = "),
            Err(ConfigParseError::Toml(_))
        ));
    }

    #[test]
    fn test_extension_dispatch() {
        let doc = ConfigDocument::from_bytes_for(Path::new("a.json"), br#"{"append": true}"#).unwrap();
        assert_eq!(doc.append, Some(true));
        let doc = ConfigDocument::from_bytes_for(Path::new("a.toml"), b"append = false").unwrap();
        assert_eq!(doc.append, Some(false));
        assert!(matches!(
            ConfigDocument::from_bytes_for(Path::new("a.ini"), b""),
            Err(ConfigParseError::UnsupportedFormat(ext)) if ext == "ini"
        ));
        assert!(ConfigDocument::from_bytes_for(Path::new("config"), b"").is_err());
    }
}
