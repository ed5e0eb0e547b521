//! Issue keys referenced from commit titles

use crate::core::error::ReconResult;
use crate::recon::model::CommitRecord;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Tracker issue key: uppercase project prefix, dash, number
static ISSUE_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]+-\d+").expect("issue key pattern compiles"));

/// What the commit titles of a branch comparison reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitKeys {
  /// Every distinct issue key seen in a non-merge title
  pub issue_keys: BTreeSet<String>,
  /// Short ids of non-merge commits whose title has no issue key
  pub commits_without_issue: BTreeSet<String>,
  /// Number of commits skipped as merges
  pub merges_skipped: usize,
}

/// Scans commit titles for issue keys, skipping merge commits
#[derive(Debug, Clone)]
pub struct IssueKeyExtractor {
  merge: Regex,
}

impl IssueKeyExtractor {
  pub fn new(merge_pattern: &str) -> ReconResult<Self> {
    Ok(Self {
      merge: Regex::new(merge_pattern)?,
    })
  }

  pub fn is_merge(&self, title: &str) -> bool {
    self.merge.is_match(title)
  }

  /// Issue keys in a single title, in order of appearance
  pub fn keys_in<'t>(&self, title: &'t str) -> impl Iterator<Item = &'t str> + use<'t> {
    ISSUE_KEY.find_iter(title).map(|m| m.as_str())
  }

  pub fn extract(&self, commits: &[CommitRecord]) -> CommitKeys {
    commits.iter().fold(CommitKeys::default(), |mut acc, commit| {
      if self.is_merge(&commit.title) {
        acc.merges_skipped += 1;
        return acc;
      }

      let mut found = false;
      for key in self.keys_in(&commit.title) {
        found = true;
        acc.issue_keys.insert(key.to_string());
      }

      if !found {
        acc.commits_without_issue.insert(commit.short_id.clone());
      }
      acc
    })
  }
}
