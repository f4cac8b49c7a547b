//! Error types for inlining and source loading.

use thiserror::Error;

/// Errors raised while inlining group references.
///
/// Any of these makes the document unloadable; no partial result is
/// produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InlineError {
    /// A reference names a group that is not in the group table.
    #[error("unknown group referenced: {0}")]
    UnknownGroup(String),

    /// A group reference has no `id` attribute.
    #[error("group reference is missing required field `id`")]
    MissingReferenceId,

    /// A group (directly or transitively) references itself.
    #[error("group references itself: {0}")]
    CyclicGroup(String),
}

/// Convenience alias for inlining results.
pub type InlineResult<T> = Result<T, InlineError>;

/// Errors raised while loading a declarative source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file extension does not name a supported format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The source could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Inlining the parsed document failed.
    #[error("inline error: {0}")]
    Inline(#[from] InlineError),

    /// I/O error reading the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for source loading results.
pub type SourceResult<T> = Result<T, SourceError>;
