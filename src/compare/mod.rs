//! Cross-document comparison.
//!
//! Diffs the aggregates of two commit documents (base vs. refactor) and
//! classifies every per-event consumption and carbon delta. The result is a
//! plain data structure; rendering and transport belong to external
//! collaborators.

mod engine;
mod schema;

pub use engine::compare_documents;
pub use schema::{ComparisonResult, DeltaStatus, EventComparison};
