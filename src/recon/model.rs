//! Records fetched from the tracker and the VCS

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A commit on the release branch that is not on the destination branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
  /// Full SHA
  pub id: String,
  /// Abbreviated SHA, used in the report
  pub short_id: String,
  /// First line of the commit message
  pub title: String,
}

/// A tracker issue scoped to a release version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
  /// `PROJECT-NUMBER`
  pub key: String,
  pub summary: String,
  pub labels: BTreeSet<String>,
  pub status_id: String,
  pub start_date: Option<NaiveDate>,
  /// Assignee display name
  pub assignee: Option<String>,
}

impl IssueRecord {
  pub fn has_label(&self, label: &str) -> bool {
    self.labels.contains(label)
  }
}

/// A tracker-side release grouping, named `<project> X.Y.Z`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseVersion {
  pub id: String,
  pub name: String,
  pub start_date: Option<NaiveDate>,
  pub release_date: Option<NaiveDate>,
  pub released: bool,
  pub archived: bool,
}
