use std::path::PathBuf;

use toolconf_actions::ActionError;
use toolconf_types::VersionStamp;

/// Errors from versioned store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persisted content no longer matches the expected version.
    #[error("managed configuration has been modified, cannot save (expected version {expected})")]
    Conflict {
        expected: VersionStamp,
        current: Option<VersionStamp>,
    },

    /// Nothing has been persisted at this location yet.
    #[error("managed configuration not initialized: {0}")]
    NotInitialized(String),

    /// A bounded retry policy gave up after this many conflicts.
    #[error("gave up after {attempts} conflicting attempts")]
    RetriesExhausted { attempts: u32 },

    /// An action in the batch could not be applied.
    #[error("action error: {0}")]
    Action(#[from] ActionError),

    /// An update payload matched neither accepted shape.
    #[error("invalid update payload: {0}")]
    InvalidPayload(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The configuration file could not be parsed.
    #[error("configuration error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// An in-process lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for the one error the retry loop recovers from.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
