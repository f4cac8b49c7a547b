//! Group inlining and declarative source loading.
//!
//! Declarative configuration sources may declare named groups of items at
//! the top level and reference them from anywhere in the tree. Before a
//! document is handed to the versioned store, every reference is replaced by
//! a copy of the referenced group's items and the group table is dropped.
//!
//! # Modules
//!
//! - [`inliner`] -- [`inline_groups`], the one-shot flattening transform
//! - [`source`] -- The [`ConfSource`] interface and the JSON/YAML loader
//! - [`view`] -- [`ConfItem`], a read-only view with typed accessors
//! - [`error`] -- [`InlineError`] and [`SourceError`]

pub mod error;
pub mod inliner;
pub mod source;
pub mod view;

pub use error::{InlineError, InlineResult, SourceError, SourceResult};
pub use inliner::inline_groups;
pub use source::{open_source, ConfSource, SourceFormat, StructuredConfSource, DEFAULT_MONITOR};
pub use view::ConfItem;
