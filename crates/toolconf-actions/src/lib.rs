//! Structural actions over configuration documents.
//!
//! An [`Action`] is one edit: create a section, create a group, add an item
//! to a target list, or disable a group. Actions arrive from callers as JSON
//! objects tagged by an `action` field; [`parse_batch`] validates a whole
//! batch up front so that an unrecognized action is rejected before anything
//! is applied. [`apply_batch`] then mutates a document in place.
//!
//! A failed batch leaves the document partially mutated. Callers own the
//! document copy and must discard it on error.

pub mod action;
pub mod error;
pub mod interpreter;

pub use action::{parse_batch, parse_target, Action, ActionKind};
pub use error::{ActionError, ActionResult};
pub use interpreter::{apply_action, apply_batch};
