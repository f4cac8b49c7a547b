//! Version-stamped store for a single managed configuration document.
//!
//! Several independent writers may edit the same document with no
//! coordinator. Each read returns the document together with the
//! [`VersionStamp`] of the exact bytes it was parsed from; each write states
//! the stamp it expects to replace and fails with [`StoreError::Conflict`]
//! if the content has moved on. [`VersionedStore::apply_batch`] wraps this
//! in a read-apply-write loop that starts over on every conflict.
//!
//! # Backends
//!
//! All backends implement the [`Backend`] trait:
//!
//! - [`FileBackend`] -- a JSON file replaced by atomic rename
//! - [`InMemoryBackend`] -- a byte buffer behind a lock, for tests and embedding
//!
//! # Design Rules
//!
//! 1. The stamp is computed from persisted bytes, never cached.
//! 2. Content is replaced wholesale; there are no partial writes.
//! 3. Of two writers expecting the same stamp, exactly one succeeds.
//! 4. Only conflicts are retried. Every other error reaches the caller.
//! 5. A batch that fails partway is discarded, never persisted.
//!
//! Writers in separate processes are not serialized against each other: the
//! compare-and-replace step is atomic within one process only.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod retry;
pub mod store;
pub mod traits;
pub mod view;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use retry::{Bounded, RetryPolicy, Unbounded};
pub use store::{Snapshot, VersionedStore};
pub use traits::Backend;
pub use view::{StoreView, UpdatePayload};

pub use toolconf_types::{ExpectedVersion, VersionStamp};
