use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tempfile::NamedTempFile;
use toolconf_types::{ExpectedVersion, VersionStamp};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_expected, Backend};

/// Commit locks for every file written by this process, keyed by the
/// canonical path of the file.
static COMMIT_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn shared_commit_lock(key: PathBuf) -> StoreResult<Arc<Mutex<()>>> {
    let registry = COMMIT_LOCKS.get_or_init(Default::default);
    let mut locks = registry.lock().map_err(|_| StoreError::LockPoisoned)?;
    Ok(Arc::clone(locks.entry(key).or_default()))
}

/// A document persisted as a single file.
///
/// New content is staged in a temporary file next to the target, synced,
/// then renamed over it, so readers see either the old bytes or the new
/// bytes and never a mix. Staging happens outside the commit lock; only the
/// read, compare and rename run under it. Every `FileBackend` in the process
/// that points at the same file shares one commit lock, however the path was
/// spelled.
// TODO: take an advisory lock on the target so writers in other processes
// are serialized as well.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    commit: OnceLock<Arc<Mutex<()>>>,
}

impl FileBackend {
    /// Back a document by the file at `path`. No I/O happens until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            commit: OnceLock::new(),
        }
    }

    /// The file this backend reads and replaces.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The process-wide lock for this file, looked up on first use.
    fn commit_lock(&self) -> StoreResult<&Arc<Mutex<()>>> {
        if let Some(lock) = self.commit.get() {
            return Ok(lock);
        }
        let lock = shared_commit_lock(self.lock_key()?)?;
        Ok(self.commit.get_or_init(|| lock))
    }

    /// Canonical directory plus file name; the file itself may not exist yet.
    fn lock_key(&self) -> StoreResult<PathBuf> {
        let name = self.path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file path: {}", self.path.display()),
            )
        })?;
        let dir = self.directory();
        fs::create_dir_all(dir)?;
        Ok(fs::canonicalize(dir)?.join(name))
    }

    fn read_current(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `bytes` to a synced temporary file in the target's directory.
    fn stage(&self, bytes: &[u8]) -> StoreResult<NamedTempFile> {
        let dir = self.directory();
        fs::create_dir_all(dir)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }
}

impl Backend for FileBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        self.read_current()
    }

    fn replace(&self, bytes: &[u8], expected: ExpectedVersion) -> StoreResult<VersionStamp> {
        let staged = self.stage(bytes)?;
        let _commit = self
            .commit_lock()?
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let current = self.read_current()?.as_deref().map(VersionStamp::of);
        check_expected(expected, current)?;
        staged
            .persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        let stamp = VersionStamp::of(bytes);
        debug!(path = %self.path.display(), version = %stamp.short_hex(), len = bytes.len(), "replaced document");
        Ok(stamp)
    }

    fn create_if_absent(&self, bytes: &[u8]) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        let staged = self.stage(bytes)?;
        let _commit = self
            .commit_lock()?
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        match staged.persist_noclobber(&self.path) {
            Ok(_) => {
                debug!(path = %self.path.display(), "created document");
                Ok(true)
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::Io(e.error)),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
