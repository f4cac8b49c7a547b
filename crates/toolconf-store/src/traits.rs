use toolconf_types::{ExpectedVersion, VersionStamp};

use crate::error::{StoreError, StoreResult};

/// Persistent home of one serialized document.
///
/// Implementations must satisfy these invariants:
/// - `load` returns exactly the bytes most recently written, with no caching.
/// - `replace` compares and writes as one step: of two concurrent callers
///   expecting the same version, exactly one succeeds and the other sees
///   [`StoreError::Conflict`].
/// - Content is replaced wholesale; a reader never observes partial bytes.
/// - All I/O errors are propagated, never silently ignored.
pub trait Backend: Send + Sync {
    /// Current persisted bytes, or `None` if nothing has been written.
    fn load(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the content with `bytes` if the current content satisfies
    /// `expected`. Returns the stamp of the new content.
    fn replace(&self, bytes: &[u8], expected: ExpectedVersion) -> StoreResult<VersionStamp>;

    /// Write `bytes` only if nothing has been persisted yet.
    ///
    /// Returns `true` if this call created the content.
    fn create_if_absent(&self, bytes: &[u8]) -> StoreResult<bool>;

    /// Human-readable location, used in errors and logs.
    fn location(&self) -> String;
}

/// Check `expected` against the stamp of the content about to be replaced.
///
/// `current` is `None` when nothing has been persisted; only
/// [`ExpectedVersion::Force`] passes in that case.
pub(crate) fn check_expected(
    expected: ExpectedVersion,
    current: Option<VersionStamp>,
) -> StoreResult<()> {
    match expected {
        ExpectedVersion::Force => Ok(()),
        ExpectedVersion::Exact(stamp) if Some(stamp) == current => Ok(()),
        ExpectedVersion::Exact(stamp) => Err(StoreError::Conflict {
            expected: stamp,
            current,
        }),
    }
}
