//! Errors raised while parsing a cache spec string.

use thiserror::Error;

/// Why a spec string was rejected by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("blank key-value pair in '{0}'")]
    BlankPair(String),

    #[error("key-value pair '{0}' has more than one '='")]
    MultipleEquals(String),

    #[error("key-value pair '{0}' has an empty key")]
    EmptyKey(String),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("key '{0}' is not supported by this cache engine")]
    Unsupported(String),

    #[error("value of key '{0}' omitted")]
    MissingValue(String),

    #[error("key '{0}' does not take a value")]
    UnexpectedValue(String),

    #[error("key '{0}' was already set")]
    Duplicate(String),

    #[error("key '{key}' value set to '{value}', must be a non-negative integer")]
    InvalidNumber { key: String, value: String },

    #[error("key '{key}' value '{value}' is out of range")]
    OutOfRange { key: String, value: String },

    #[error("key '{key}' invalid duration '{value}', must end with one of [dDhHmMsS]")]
    InvalidDuration { key: String, value: String },
}
