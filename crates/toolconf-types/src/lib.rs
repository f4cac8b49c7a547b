//! Structural model for managed toolbox configuration documents.
//!
//! A configuration document is an ordered tree of items. Some items are
//! sections that own further items; before loading, the tree may also hold
//! references to named groups declared at the top level. Every other
//! `toolconf` crate depends on `toolconf-types`.
//!
//! # Key Types
//!
//! - [`Item`] -- A node of the tree: a kind tag, free-form attributes, and
//!   optional children
//! - [`ItemKind`] -- Classification of an item (section, group reference, leaf)
//! - [`Group`] -- A named, reusable list of items with an `enabled` flag
//! - [`Document`] -- The root container (items plus the pre-inlining group table)
//! - [`Target`] -- Locator used by structural actions (root, section id, group id)
//! - [`VersionStamp`] -- BLAKE3 digest of the persisted bytes, the optimistic
//!   concurrency token
//! - [`ExpectedVersion`] -- The version a writer expects, or the force sentinel
//!
//! # Traversal
//!
//! - [`find_by_id`] scans a single item list
//! - [`ItemList`] lazily creates an item list on a container

pub mod document;
pub mod error;
pub mod item;
pub mod target;
pub mod version;

pub use document::{Document, Group};
pub use error::TypeError;
pub use item::{find_by_id, Item, ItemKind, ItemList};
pub use target::Target;
pub use version::{ExpectedVersion, VersionStamp};
