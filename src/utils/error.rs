//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading or updating a commit document
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted document failed structural validation. The submission
    /// is aborted and the on-disk state is left untouched.
    #[error("corrupt commit document: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize document: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("timed out waiting for document lock: {0}")]
    LockTimeout(String),
}

/// Raised when a baseline-corrected view is requested for a commit that
/// never received a baseline
#[derive(Error, Debug)]
#[error("commit document has no baseline")]
pub struct MissingBaselineError;

/// Errors that can occur when comparing two commit documents
#[derive(Error, Debug)]
pub enum CompareError {
    /// The named side has no `aggregate.withBaseline` section, so there is
    /// nothing to drive the comparison with.
    #[error("{0} document has no aggregate to compare")]
    MissingAggregate(&'static str),

    #[error("failed to read document: {0}")]
    ReadFailed(#[from] StoreError),
}

/// Errors raised when resolving or running a measurement method
#[derive(Error, Debug)]
pub enum MethodError {
    #[error("unknown measurement method: {0}")]
    Unknown(String),

    #[error("measurement method {0} is not supported yet")]
    Unsupported(&'static str),
}

/// Errors from the external carbon-intensity source.
///
/// These are soft failures: callers log them and skip enrichment rather
/// than aborting the submission.
#[derive(Error, Debug)]
pub enum CarbonError {
    #[error("carbon intensity request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("carbon intensity response: {0}")]
    InvalidResponse(String),
}
