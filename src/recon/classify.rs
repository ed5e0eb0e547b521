//! Splitting a release's issues into scope, open work and the release instruction

use crate::recon::model::IssueRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Issues of a release, sorted by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedIssues {
  /// Keys in reconciliation scope (release-instruction issues excluded)
  pub issues: BTreeSet<String>,
  /// Subset of `issues` whose status is not the closed status
  pub open_issues: BTreeSet<String>,
  /// First issue carrying the release-instruction label
  pub release_instruction: Option<String>,
  /// Assignee of the release-instruction issue
  pub performer: Option<String>,
  /// Further labeled issues, excluded from scope but not used
  pub extra_instructions: Vec<String>,
  /// Summary of every release issue, instruction issues included
  pub summaries: BTreeMap<String, String>,
}

/// Classify release issues.
///
/// When several issues carry `instruction_label`, the first in tracker order
/// is the release instruction. All of them stay out of `issues`.
pub fn classify_issues(issues: &[IssueRecord], instruction_label: &str, closed_status_id: &str) -> ClassifiedIssues {
  issues.iter().fold(ClassifiedIssues::default(), |mut acc, issue| {
    acc.summaries.insert(issue.key.clone(), issue.summary.clone());

    if issue.has_label(instruction_label) {
      if acc.release_instruction.is_none() {
        acc.release_instruction = Some(issue.key.clone());
        acc.performer = issue.assignee.clone();
      } else {
        acc.extra_instructions.push(issue.key.clone());
      }
      return acc;
    }

    acc.issues.insert(issue.key.clone());
    if issue.status_id != closed_status_id {
      acc.open_issues.insert(issue.key.clone());
    }
    acc
  })
}
