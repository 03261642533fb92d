//! The color table used to decorate console output.

use std::collections::BTreeMap;

use tint::{Color, ParseColorError};

use crate::format::keys;
use crate::level::Level;

/// Mapping from a field or level name to the color its values are painted in.
///
/// Iteration is ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: BTreeMap<String, Color>,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTable {
    /// Creates the built-in table.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.set(Level::Info.as_str(), Color::from_packed(0x00_AA_FF));
        table.set(Level::Debug.as_str(), Color::from_packed(0xAA_AA_AA));
        table.set(Level::Warning.as_str(), Color::YELLOW);
        table.set(Level::Error.as_str(), Color::from_packed(0xFF_22_22));
        table.set(Level::Critical.as_str(), Color::MAGENTA);
        table.set(keys::CONTEXT, Color::from_packed(0xAA_AA_AA));
        table.set(keys::DATE, Color::from_packed(0x00_AA_00));
        table.set(keys::MESSAGE, Color::RESET);
        table
    }

    /// Creates a table with no entries; every lookup falls back to reset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the color registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Color> {
        self.entries.get(name).copied()
    }

    /// Sets the color for `name`, returning the one it replaced.
    pub fn set(&mut self, name: impl Into<String>, color: Color) -> Option<Color> {
        self.entries.insert(name.into(), color)
    }

    /// Removes the color for `name`.
    pub fn remove(&mut self, name: &str) -> Option<Color> {
        self.entries.remove(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the color for a field value.
    ///
    /// Lookup order: the field name itself, then (for the `type` field
    /// only) the field's value, i.e. the level name, then reset.
    #[must_use]
    pub fn resolve(&self, field: &str, value: &str) -> Color {
        self.get(field)
            .or_else(|| {
                if field == keys::TYPE {
                    self.get(value)
                } else {
                    None
                }
            })
            .unwrap_or(Color::RESET)
    }

    /// Overlays `#RRGGBB` entries onto the table.
    ///
    /// All entries are parsed before any is applied, so a malformed entry
    /// leaves the table untouched.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseColorError`] encountered.
    pub fn overlay_hex<'a, I>(&mut self, entries: I) -> Result<(), ParseColorError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let parsed = entries
            .into_iter()
            .map(|(name, hex)| Color::from_hex(hex).map(|c| (name.clone(), c)))
            .collect::<Result<Vec<_>, _>>()?;
        self.entries.extend(parsed);
        Ok(())
    }

    /// Iterates over `(name, color)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Renders the table as `name='#RRGGBB'` pairs separated by `, `.
    #[must_use]
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(name, color)| format!("{name}='{}'", color.describe()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(String, Color)> for ColorTable {
    fn from_iter<T: IntoIterator<Item = (String, Color)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, Color)> for ColorTable {
    fn extend<T: IntoIterator<Item = (String, Color)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
