//! Advisory file lock for per-key document updates.
//!
//! Submissions for the same commit key are a read-modify-write cycle on one
//! JSON file; two unsynchronized writers would both compute the same next
//! measurement index and one would be lost. The lock file next to the
//! document serializes writers across processes.

use crate::utils::error::StoreError;
use fs4::fs_std::FileExt;
use std::fs::File;
use std::time::{Duration, Instant};

/// Acquire an exclusive lock on `file`, waiting up to `timeout`
pub(crate) fn lock_file_guard(file: &File, timeout: Duration) -> Result<LockGuard<'_>, StoreError> {
    let start = Instant::now();
    loop {
        if matches!(FileExt::try_lock_exclusive(file), Ok(true)) {
            return Ok(LockGuard { file });
        }

        if start.elapsed() >= timeout {
            return Err(StoreError::LockTimeout(
                "another writer holds the commit document lock".to_string(),
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Released on drop
#[derive(Debug)]
pub(crate) struct LockGuard<'a> {
    file: &'a File,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.file);
    }
}
