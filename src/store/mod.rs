//! The per-commit aggregate store.
//!
//! Owns one persisted JSON document per commit/session key. All cross-call
//! state lives in these documents: handlers are stateless, so every
//! submission is a load -> mutate -> atomic-store cycle guarded by a
//! per-key advisory file lock. Reads are lock-free and may observe the
//! previous fully-written snapshot, never a torn one.

mod document;
mod lock;
mod schema;

pub use schema::{
    AggregateSummary, Baseline, CommitDocument, EventMap, Measurement, MeasurementSet,
};

use crate::utils::config::LOCK_TIMEOUT;
use crate::utils::error::StoreError;
use lock::lock_file_guard;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Document store rooted at a directory, one JSON file per commit key
pub struct CommitStore {
    root: PathBuf,
}

impl CommitStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the document for `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.lock", key))
    }

    /// Read the current document without taking the lock.
    ///
    /// An unknown key yields the empty document - that is the valid initial
    /// state, not an error. Readers may see a snapshot that is one
    /// submission behind a concurrent writer.
    pub fn load(&self, key: &str) -> Result<CommitDocument, StoreError> {
        read_document(self.document_path(key))
    }

    /// Replace the baseline for `key` and fix up earlier measurements
    pub fn submit_baseline(
        &self,
        key: &str,
        baseline: Baseline,
    ) -> Result<CommitDocument, StoreError> {
        info!("Submitting baseline for {}", key);
        self.update(key, |document| document.set_baseline(baseline))
            .map(|(_, document)| document)
    }

    /// Append a measurement for `key` at the next unused slot
    pub fn submit_measurement(
        &self,
        key: &str,
        events: EventMap,
        timer_start: Option<i64>,
        timer_end: Option<i64>,
    ) -> Result<(u64, CommitDocument), StoreError> {
        info!("Submitting measurement for {}", key);
        self.update(key, |document| {
            document.push_measurement(events, timer_start, timer_end)
        })
    }

    /// One locked read-modify-write cycle against the document for `key`
    ///
    /// **Public** - also used for in-place enrichment. The mutation runs
    /// against the loaded document; the result is written atomically, so a
    /// failed cycle leaves the previous document intact.
    pub fn update<T>(
        &self,
        key: &str,
        mutate: impl FnOnce(&mut CommitDocument) -> T,
    ) -> Result<(T, CommitDocument), StoreError> {
        std::fs::create_dir_all(&self.root)?;

        let lock_file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(key))?;
        let _lock = lock_file_guard(&lock_file, LOCK_TIMEOUT)?;

        let path = self.document_path(key);
        let mut document = read_document(&path)?;
        let outcome = mutate(&mut document);
        write_document_atomic(&path, &document)?;

        Ok((outcome, document))
    }
}

/// Read a commit document from a JSON file
///
/// **Public** - also used by the compare/validate/report commands, which
/// operate on already-located document paths.
pub fn read_document(path: impl AsRef<Path>) -> Result<CommitDocument, StoreError> {
    let path = path.as_ref();

    if !path.exists() {
        debug!("No document at {}, starting empty", path.display());
        return Ok(CommitDocument::default());
    }

    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
}

/// Write the document via a temp file rename so readers never see a torn file
///
/// **Private** - internal persistence step.
fn write_document_atomic(path: &Path, document: &CommitDocument) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut contents = serde_json::to_string_pretty(document)?;
    contents.push('\n');

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}
