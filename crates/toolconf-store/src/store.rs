use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use toolconf_actions::{apply_batch, Action};
use toolconf_types::{Document, ExpectedVersion, VersionStamp};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::file::FileBackend;
use crate::retry::{RetryPolicy, Unbounded};
use crate::traits::Backend;

/// A document together with the stamp of the bytes it was parsed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: VersionStamp,
    pub document: Document,
}

/// Optimistic-concurrency store for one configuration document.
///
/// The store keeps no copy of the document between calls. Every read goes
/// to the backend, every write is conditional on the version the caller
/// started from.
pub struct VersionedStore<B = FileBackend> {
    backend: B,
    retry: Box<dyn RetryPolicy>,
    pretty: bool,
}

impl VersionedStore<FileBackend> {
    /// A store over the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }
}

impl<B: Backend> VersionedStore<B> {
    /// Create a store with the default, unbounded retry policy.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry: Box::new(Unbounded),
            pretty: false,
        }
    }

    /// Builder: replace the retry policy used by [`VersionedStore::apply_batch`].
    pub fn with_retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry = Box::new(policy);
        self
    }

    /// Builder: write indented JSON instead of compact JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The policy [`VersionedStore::apply_batch`] consults after a conflict.
    pub fn retry_policy(&self) -> &dyn RetryPolicy {
        self.retry.as_ref()
    }

    /// Read the persisted document and the stamp of its exact bytes.
    pub fn read(&self) -> StoreResult<Snapshot> {
        let bytes = self
            .backend
            .load()?
            .ok_or_else(|| StoreError::NotInitialized(self.backend.location()))?;
        let version = VersionStamp::of(&bytes);
        let document =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
        debug!(version = %version.short_hex(), len = bytes.len(), "read document");
        Ok(Snapshot { version, document })
    }

    /// Replace the persisted document if it still has the `expected` version.
    ///
    /// [`ExpectedVersion::Force`] skips the comparison; it is meant for
    /// writing a freshly loaded source, not for routine edits.
    pub fn update(
        &self,
        document: &Document,
        expected: impl Into<ExpectedVersion>,
    ) -> StoreResult<VersionStamp> {
        let bytes = self.serialize(document)?;
        self.backend.replace(&bytes, expected.into())
    }

    /// Persist the empty document `{}` if nothing has been written yet.
    pub fn ensure_exists(&self) -> StoreResult<()> {
        let bytes = self.serialize(&Document::empty())?;
        if self.backend.create_if_absent(&bytes)? {
            debug!(location = %self.backend.location(), "initialized empty document");
        }
        Ok(())
    }

    /// Apply `actions` to the latest document and persist the result,
    /// starting over from a fresh read whenever another writer got there
    /// first. Uses the store's retry policy.
    pub fn apply_batch(&self, actions: &[Action]) -> StoreResult<VersionStamp> {
        self.apply_batch_with(actions, self.retry_policy())
    }

    /// [`VersionedStore::apply_batch`] with an explicit retry policy.
    ///
    /// Action errors abort immediately and nothing is written; they do not
    /// depend on which revision the batch ran against.
    pub fn apply_batch_with(
        &self,
        actions: &[Action],
        policy: &dyn RetryPolicy,
    ) -> StoreResult<VersionStamp> {
        let mut conflicts = 0u32;
        loop {
            self.ensure_exists()?;
            let Snapshot {
                version,
                mut document,
            } = self.read()?;
            apply_batch(&mut document, actions)?;

            match self.update(&document, version) {
                Ok(stamp) => {
                    debug!(
                        actions = actions.len(),
                        from = %version.short_hex(),
                        to = %stamp.short_hex(),
                        "committed batch"
                    );
                    return Ok(stamp);
                }
                Err(err) if err.is_conflict() => {
                    conflicts += 1;
                    if !policy.retry_after(conflicts) {
                        return Err(StoreError::RetriesExhausted {
                            attempts: conflicts,
                        });
                    }
                    warn!(attempt = conflicts, version = %version.short_hex(), "concurrent write detected; retrying batch");
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn serialize(&self, document: &Document) -> StoreResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        bytes.map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for VersionedStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedStore")
            .field("backend", &self.backend)
            .field("pretty", &self.pretty)
            .finish()
    }
}
