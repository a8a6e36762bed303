use std::sync::Arc;

use crate::Kind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("{kind} expects at least {min} argument(s), got {given}")]
    TooFewArguments {
        kind: Kind,
        min: usize,
        given: usize,
    },
    /// `index` is 1-based.
    #[error("type of argument {index} is invalid for {kind}")]
    InvalidArgumentType { index: usize, kind: Kind },
    #[error(
        "argument {index} of comment contains illegal character `{character}` at offset {offset}"
    )]
    IllegalCommentCharacter {
        index: usize,
        offset: usize,
        character: char,
    },
    #[error("the minimum cannot be less than 0")]
    NegativeMinimum,
    #[error("the maximum cannot be less than 0")]
    NegativeMaximum,
    #[error("the minimum cannot be infinite")]
    InfiniteMinimum,
    #[error("the maximum ({max}) cannot be less than the minimum ({min})")]
    MaximumLessThanMinimum { min: u64, max: u64 },
    #[error("{0} fragment has no repetition bounds")]
    NotARepetition(Kind),
    #[error("invalid modifier shortcut `{0}`, use one of: i, m, s, x")]
    UnknownModifier(char),
    #[error("invalid settings: {0}")]
    Settings(Arc<toml_edit::de::Error>),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<toml_edit::de::Error> for Error {
    #[inline]
    fn from(err: toml_edit::de::Error) -> Self {
        Self::Settings(Arc::new(err))
    }
}

/// Failure reported by the host engine when it is handed a rendered pattern.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("empty pattern; expected a start delimiter")]
    MissingDelimiter,
    #[error("no ending delimiter `{0}` found")]
    UnterminatedPattern(char),
    #[error("unknown modifier `{0}`")]
    UnknownFlag(char),
    #[error(transparent)]
    Compile(Arc<regex::Error>),
}

impl From<regex::Error> for EngineError {
    #[inline]
    fn from(err: regex::Error) -> Self {
        Self::Compile(Arc::new(err))
    }
}
