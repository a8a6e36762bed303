use crate::Error;

/// An engine-wide matching flag, written as a single letter after the closing
/// delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    /// `i`: letters match both upper and lower case.
    Insensitive,
    /// `m`: `^` and `$` match at line boundaries.
    MultiLine,
    /// `s`: `.` also matches newlines.
    SingleLine,
    /// `x`: whitespace in the pattern is ignored.
    Extended,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::Insensitive,
        Modifier::MultiLine,
        Modifier::SingleLine,
        Modifier::Extended,
    ];

    #[must_use]
    pub fn shortcut(self) -> char {
        match self {
            Modifier::Insensitive => 'i',
            Modifier::MultiLine => 'm',
            Modifier::SingleLine => 's',
            Modifier::Extended => 'x',
        }
    }

    pub fn from_shortcut(shortcut: char) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|m| m.shortcut() == shortcut)
            .ok_or(Error::UnknownModifier(shortcut))
    }
}

impl TryFrom<char> for Modifier {
    type Error = Error;

    #[inline]
    fn try_from(shortcut: char) -> Result<Self, Error> {
        Self::from_shortcut(shortcut)
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write as _;
        f.write_char(self.shortcut())
    }
}
