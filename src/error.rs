//! Error types for document loading and conversion.
//!
//! Every conversion error is fatal: the first one aborts the whole conversion and
//! whatever the registry picked up on the way is left for the caller to discard.

use thiserror::Error;

/// Failure while turning JSON text or a `serde_json::Value` into a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The JSON did not fit the document shape at all.
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },

    /// The JSON parsed but a node is unusable as a schema node.
    #[error("malformed schema node at {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Failure while mapping a schema document onto the type graph.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported type `{keyword}` at {path}")]
    UnsupportedScalarType { path: String, keyword: String },

    #[error("enum at {path} must be string-typed, found {found}")]
    UnsupportedEnumBaseType { path: String, found: String },

    #[error("unknown type reference `{reference}` at {path}")]
    UnknownTypeReference { path: String, reference: String },

    #[error("top-level schema is missing a usable `id`/`$id`")]
    MissingTopLevelIdentifier,

    /// Two different literals of one enum sanitize to the same member name.
    #[error("enum at {path}: literals {first:?} and {second:?} both map to member `{key}`")]
    EnumKeyCollision {
        path: String,
        key: String,
        first: String,
        second: String,
    },

    /// Two different schema locations produce the same type name.
    #[error("type name `{name}` is produced by both {first} and {second}")]
    TypeNameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("union `{union}` member `{member}` is not an object type")]
    UnionMemberNotObject { union: String, member: String },

    #[error("no enum registered at {path}")]
    UnknownEnumPath { path: String },
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
