//! Error types for the pattern model and pattern store.
//!
//! Uses [`thiserror`] for error derivation. Only structurally invalid calls
//! surface as errors: failures tied to a single pattern or primitive during
//! extraction are logged and skipped.

use thiserror::Error;

use crate::pattern::SourceKind;

/// Errors reported by the pattern model and store.
#[derive(Debug, Error)]
pub enum TagError {
    /// A pattern was compared against a value of another type.
    #[error("type mismatch: expected a Pattern, got {found}")]
    TypeMismatch {
        /// Name of the type that was supplied.
        found: &'static str,
    },

    /// A pattern lacks the reference rectangle or style its source kind requires.
    #[error("pattern for field '{field}' of kind {kind} is missing its {missing}")]
    MissingLocator {
        field: String,
        kind: SourceKind,
        /// What is missing ("reference rectangle", "style signature", "axis mode").
        missing: &'static str,
    },

    /// Confidence counters violate `matches_count >= errors_count >= 0`, `matches_count >= 1`.
    #[error("invalid counters for field '{field}': matches {matches}, errors {errors}")]
    InvalidCounts {
        field: String,
        matches: u32,
        errors: u32,
    },

    /// A pattern's regular expression does not compile.
    #[error("invalid regex '{regex}': {source}")]
    InvalidRegex {
        regex: String,
        #[source]
        source: regex::Error,
    },

    /// A source kind name is not one of the known kinds.
    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),

    /// An axis mode name is not one of `NA`, `X`, `Y`.
    #[error("unknown axis mode: {0}")]
    UnknownAxis(String),

    /// A field type name is not one of the known types.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    /// A pattern targets a field the metadata schema does not declare.
    #[error("unknown metadata field: {0}")]
    UnknownField(String),

    /// JSON (de)serialization failed.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a profile failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for pattern store operations.
pub type Result<T> = std::result::Result<T, TagError>;
