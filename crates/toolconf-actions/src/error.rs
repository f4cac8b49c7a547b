//! Error types for action parsing and application.

use thiserror::Error;
use toolconf_types::Target;

/// Errors that can occur while parsing or applying an action.
///
/// None of these are caused by a stale document, so none are worth
/// retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The action payload is not a JSON object.
    #[error("action must be an object, got {0}")]
    NotAnObject(String),

    /// The payload has no `action` field.
    #[error("action payload is missing the `action` field")]
    MissingAction,

    /// The `action` field names no supported action.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A required parameter is absent.
    #[error("{action}: missing required field `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    /// A parameter is present but has the wrong shape.
    #[error("{action}: invalid field `{field}`: {reason}")]
    InvalidField {
        action: &'static str,
        field: &'static str,
        reason: String,
    },

    /// A parameter the action does not accept.
    #[error("{action}: unexpected field `{field}`")]
    UnexpectedField { action: &'static str, field: String },

    /// A target locator that is neither `root`, a section nor a group.
    #[error("unknown target type: {0}")]
    InvalidTarget(String),

    /// The target names a section or group that does not exist.
    #[error("unresolved target: {0}")]
    UnresolvedTarget(Target),

    /// The action cannot be applied to this kind of target.
    #[error("{action}: unsupported target {target}")]
    UnsupportedTarget {
        action: &'static str,
        target: Target,
    },
}

/// Convenience alias for action results.
pub type ActionResult<T> = Result<T, ActionError>;
