//! Run metadata catalogue interface.
//!
//! Per processed run the surrounding service records where the commit
//! document lives and which repository/branch/commit it belongs to. The
//! storage itself (typically a relational database) is an external
//! collaborator; this module defines the interface the comparison flow
//! needs to resolve "latest run per branch", plus an in-memory
//! implementation used in tests and single-process setups.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Metadata for one processed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Commit/session key the document is stored under
    pub session_id: String,
    pub repository: String,
    pub branch: String,
    pub commit_hash: String,
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    /// Refactoring approach label, free-form
    pub approach: Option<String>,
    pub method: Option<String>,
    pub label: Option<String>,
    /// Where the commit document lives
    pub document_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Filter over catalogue records; `None` fields match anything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFilter {
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub commit_hash: Option<String>,
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    pub approach: Option<String>,
    pub method: Option<String>,
    pub label: Option<String>,
}

impl RunFilter {
    pub fn matches(&self, record: &RunRecord) -> bool {
        fn accept(filter: &Option<String>, value: &Option<String>) -> bool {
            match filter {
                Some(wanted) => value.as_deref() == Some(wanted.as_str()),
                None => true,
            }
        }

        self.repository
            .as_deref()
            .map_or(true, |r| record.repository == r)
            && self.branch.as_deref().map_or(true, |b| record.branch == b)
            && self
                .commit_hash
                .as_deref()
                .map_or(true, |c| record.commit_hash == c)
            && accept(&self.workflow_id, &record.workflow_id)
            && accept(&self.workflow_name, &record.workflow_name)
            && accept(&self.approach, &record.approach)
            && accept(&self.method, &record.method)
            && accept(&self.label, &record.label)
    }
}

/// Catalogue of processed runs
pub trait RunCatalogue {
    /// Record one processed run
    fn record(&mut self, run: RunRecord);

    /// The most recently created run for a repository/branch pair.
    ///
    /// Inputs are trimmed; CI pipelines are sloppy with whitespace.
    fn latest(&self, repository: &str, branch: &str) -> Option<RunRecord>;

    /// All runs matching the filter
    fn find(&self, filter: &RunFilter) -> Vec<RunRecord>;
}

/// In-memory catalogue for tests and single-process use
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    runs: Vec<RunRecord>,
}

impl RunCatalogue for MemoryCatalogue {
    fn record(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    fn latest(&self, repository: &str, branch: &str) -> Option<RunRecord> {
        let repository = repository.trim();
        let branch = branch.trim();

        self.runs
            .iter()
            .filter(|run| run.repository == repository && run.branch == branch)
            .max_by_key(|run| run.created_at)
            .cloned()
    }

    fn find(&self, filter: &RunFilter) -> Vec<RunRecord> {
        self.runs
            .iter()
            .filter(|run| filter.matches(run))
            .cloned()
            .collect()
    }
}
