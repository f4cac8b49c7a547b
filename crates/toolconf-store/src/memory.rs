use std::sync::RwLock;

use toolconf_types::{ExpectedVersion, VersionStamp};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_expected, Backend};

/// In-memory backend.
///
/// Intended for tests and embedding. The document bytes live behind a
/// `RwLock`; `replace` holds the write lock across the compare and the write.
#[derive(Default)]
pub struct InMemoryBackend {
    content: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a backend with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend already holding `bytes`.
    pub fn with_content(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content: RwLock::new(Some(bytes.into())),
        }
    }
}

impl Backend for InMemoryBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        let content = self.content.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(content.clone())
    }

    fn replace(&self, bytes: &[u8], expected: ExpectedVersion) -> StoreResult<VersionStamp> {
        let mut content = self.content.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = content.as_deref().map(VersionStamp::of);
        check_expected(expected, current)?;
        *content = Some(bytes.to_vec());
        Ok(VersionStamp::of(bytes))
    }

    fn create_if_absent(&self, bytes: &[u8]) -> StoreResult<bool> {
        let mut content = self.content.write().map_err(|_| StoreError::LockPoisoned)?;
        if content.is_some() {
            return Ok(false);
        }
        *content = Some(bytes.to_vec());
        Ok(true)
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self
            .content
            .read()
            .ok()
            .and_then(|content| content.as_ref().map(Vec::len));
        f.debug_struct("InMemoryBackend")
            .field("content_len", &len)
            .finish()
    }
}
