use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::file::FileBackend;
use crate::retry::{Bounded, RetryPolicy, Unbounded};
use crate::store::VersionedStore;

/// Default document location, relative to the working directory.
pub const DEFAULT_PATH: &str = "managed_tool_conf.json";

/// Store settings, usually read from a TOML file:
///
/// ```toml
/// path = "/srv/toolbox/managed_tool_conf.json"
/// max_attempts = 16
/// pretty = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Total attempts per batch. Absent means retry until the write lands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            max_attempts: None,
            pretty: false,
        }
    }
}

impl StoreConfig {
    /// Defaults with the document at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| StoreError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| StoreError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })
    }

    pub fn retry_policy(&self) -> Box<dyn RetryPolicy> {
        match self.max_attempts {
            Some(max_attempts) => Box::new(Bounded::new(max_attempts)),
            None => Box::new(Unbounded),
        }
    }

    /// Open a file-backed store with these settings.
    pub fn open(&self) -> VersionedStore<FileBackend> {
        VersionedStore::open(&self.path)
            .with_pretty(self.pretty)
            .with_retry_policy(self.retry_policy())
    }
}
