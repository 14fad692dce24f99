//! Error Module
//!
//! Failures raised by the localization passes and the runtime lookup.

use crate::tokens::TokenKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocalizeError>;

#[derive(Debug, Error)]
pub enum LocalizeError {
    /// A token kind name that is not one of `elements`, `expressions`, `placeholders`.
    #[error("unknown token kind `{0}`")]
    UnknownTokenKind(String),

    /// A canonical node or lookup call that breaks its shape contract.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("missing binding for {kind} placeholder `{name}`")]
    MissingBinding { kind: TokenKind, name: String },

    #[error("could not parse {path}: {message}")]
    ParseFailure { path: String, message: String },

    #[error("key `{key}` is shared by \"{existing}\" and \"{incoming}\"")]
    KeyCollision {
        key: String,
        existing: String,
        incoming: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
