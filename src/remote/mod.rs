//! Tracker and VCS collaborators
//!
//! The reconciliation only needs three calls, so each side is a small trait.
//! The command layer works against the traits; Jira and GitLab are the
//! shipped implementations.

pub mod gitlab;
pub mod http;
pub mod jira;

use crate::core::error::ReconResult;
use crate::recon::model::{CommitRecord, IssueRecord, ReleaseVersion};

/// Source of release versions and release-scoped issues
pub trait IssueTracker {
  /// All versions of a project, in tracker order (oldest first for Jira)
  fn project_versions(&self, project: &str) -> ReconResult<Vec<ReleaseVersion>>;

  /// Issues matching `jql`, at most `max_results`
  fn search_issues(&self, jql: &str, max_results: usize) -> ReconResult<Vec<IssueRecord>>;
}

/// Source of the commits a release branch adds over a destination branch
pub trait CommitSource {
  fn compare_branches(&self, source: &str, dest: &str) -> ReconResult<Vec<CommitRecord>>;
}

/// JQL selecting every issue whose fix version is `release_id`
pub fn release_jql(project: &str, release_id: &str) -> String {
  format!("project = {} AND fixVersion = {}", project, release_id)
}
