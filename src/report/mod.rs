//! Release reconciliation report
//!
//! The report is a flat record so it can be rendered as text for humans or
//! handed to other tooling as JSON.

use crate::core::error::{ReconResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Date format used for every date in the report
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Pre-release checklist for one release branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseReport {
  pub report_date: String,
  pub release_version: String,
  pub project_name: String,
  pub release_id: String,
  pub release_name: String,
  /// Release start date, or the absent placeholder
  pub release_date: String,
  pub branch: String,
  pub dst_branch: String,
  /// Release-instruction issue key, or the absent placeholder
  pub release_instruction: String,
  /// Assignee of the release-instruction issue, or the absent placeholder
  pub performer_name: String,
  /// Every release issue (instruction issue included) with its summary
  pub issue_titles: BTreeMap<String, String>,
  /// In-scope issues no commit references
  pub missing_from_commits: BTreeMap<String, String>,
  /// In-scope issues not yet closed
  pub open_issues: Vec<String>,
  /// Keys referenced by commits but outside the release, with a commit search link
  pub unscoped_issue_urls: BTreeMap<String, String>,
  /// Commits with no issue key, with a commit link
  pub commits_without_issue_urls: BTreeMap<String, String>,
}

/// Links into the VCS web UI for a project and branch
#[derive(Debug, Clone)]
pub struct ReportLinks {
  base_url: String,
  project_path: String,
  branch: String,
}

impl ReportLinks {
  pub fn new(base_url: &str, project_path: &str, branch: &str) -> Self {
    Self {
      base_url: crate::utils::trim_base_url(base_url),
      project_path: project_path.trim_matches('/').to_string(),
      branch: branch.to_string(),
    }
  }

  /// Branch history filtered to commits mentioning `key`
  pub fn commit_search(&self, key: &str) -> String {
    format!("{}/{}/commits/{}?search={}", self.base_url, self.project_path, self.branch, key)
  }

  pub fn commit(&self, short_id: &str) -> String {
    format!("{}/{}/-/commit/{}", self.base_url, self.project_path, short_id)
  }
}

impl ReleaseReport {
  /// Whether the checklist has anything to act on
  pub fn is_clean(&self) -> bool {
    self.missing_from_commits.is_empty()
      && self.unscoped_issue_urls.is_empty()
      && self.commits_without_issue_urls.is_empty()
      && self.open_issues.is_empty()
  }

  pub fn to_json(&self) -> ReconResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Write the JSON record to `path`
  pub fn write_json(&self, path: &Path) -> ReconResult<()> {
    let json = self.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))
  }

  /// Human-readable checklist
  pub fn render_text(&self) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📋 Release {} {} ({})", self.project_name, self.release_version, self.report_date);
    let _ = writeln!(out);
    let _ = writeln!(out, "   Release:      {} (id {})", self.release_name, self.release_id);
    let _ = writeln!(out, "   Start date:   {}", self.release_date);
    let _ = writeln!(out, "   Branch:       {} → {}", self.branch, self.dst_branch);
    let _ = writeln!(out, "   Instructions: {}", self.release_instruction);
    let _ = writeln!(out, "   Performer:    {}", self.performer_name);
    let _ = writeln!(out, "   Issues:       {}", self.issue_titles.len());
    let _ = writeln!(out);

    if !self.missing_from_commits.is_empty() {
      let _ = writeln!(out, "🔴 Issues without commits ({})", self.missing_from_commits.len());
      for (key, summary) in &self.missing_from_commits {
        let _ = writeln!(out, "   {}  {}", key, summary);
      }
      let _ = writeln!(out);
    }

    if !self.open_issues.is_empty() {
      let _ = writeln!(out, "🟡 Open issues ({})", self.open_issues.len());
      for key in &self.open_issues {
        let summary = self.issue_titles.get(key).map(String::as_str).unwrap_or("");
        let _ = writeln!(out, "   {}  {}", key, summary);
      }
      let _ = writeln!(out);
    }

    if !self.unscoped_issue_urls.is_empty() {
      let _ = writeln!(out, "🟠 Commits referencing issues outside the release ({})", self.unscoped_issue_urls.len());
      for (key, url) in &self.unscoped_issue_urls {
        let _ = writeln!(out, "   {}  {}", key, url);
      }
      let _ = writeln!(out);
    }

    if !self.commits_without_issue_urls.is_empty() {
      let _ = writeln!(out, "⚪ Commits without an issue ({})", self.commits_without_issue_urls.len());
      for (id, url) in &self.commits_without_issue_urls {
        let _ = writeln!(out, "   {}  {}", id, url);
      }
      let _ = writeln!(out);
    }

    if self.is_clean() {
      let _ = writeln!(out, "✅ Release scope and commits agree");
    }

    out
  }
}
