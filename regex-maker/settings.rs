use crate::{DELIMITER, Error, Modifier};

/// Initial state of a [`RegEx`](crate::RegEx) builder.
///
/// ```toml
/// start = "#"
/// end = "#"
/// modifiers = ["insensitive", "multi-line"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub start: String,
    pub end: String,
    /// Activated in order.
    pub modifiers: Vec<Modifier>,
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Self {
            start: DELIMITER.to_string(),
            end: DELIMITER.to_string(),
            modifiers: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        Ok(toml_edit::de::from_str(source)?)
    }
}
