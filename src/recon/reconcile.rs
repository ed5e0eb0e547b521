//! Cross-referencing a release's tracker scope with its branch commits

use crate::core::config::ReconConfig;
use crate::core::error::ReconResult;
use crate::recon::classify::{ClassifiedIssues, classify_issues};
use crate::recon::events::ReconEvent;
use crate::recon::extract::{CommitKeys, IssueKeyExtractor};
use crate::recon::model::{CommitRecord, IssueRecord, ReleaseVersion};
use crate::report::{REPORT_DATE_FORMAT, ReleaseReport, ReportLinks};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Derived sets of one reconciliation, fixed once computed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
  pub issues: BTreeSet<String>,
  pub open_issues: BTreeSet<String>,
  pub release_instruction: Option<String>,
  pub commit_issue_keys: BTreeSet<String>,
  pub commits_without_issue: BTreeSet<String>,
}

/// Set difference between release scope and commit references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
  /// In scope, never referenced by a commit
  pub missing_from_commits: BTreeSet<String>,
  /// Referenced by a commit, not in scope, marker-excluded keys removed
  pub unscoped: BTreeSet<String>,
  /// Unscoped keys dropped because they contain the exclusion marker
  pub excluded: BTreeSet<String>,
}

/// Compute both differences. Keys containing `excluded_marker` never count as unscoped.
pub fn diff_keys(issues: &BTreeSet<String>, commit_keys: &BTreeSet<String>, excluded_marker: &str) -> KeyDiff {
  let missing_from_commits = issues.difference(commit_keys).cloned().collect();
  let (excluded, unscoped) = commit_keys
    .difference(issues)
    .cloned()
    .partition(|key: &String| !excluded_marker.is_empty() && key.contains(excluded_marker));

  KeyDiff {
    missing_from_commits,
    unscoped,
    excluded,
  }
}

/// Why a run ended without a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingReason {
  NoReleaseIssues,
  NoCommitIssueKeys,
}

impl fmt::Display for NothingReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NothingReason::NoReleaseIssues => write!(f, "the release has no issues in scope"),
      NothingReason::NoCommitIssueKeys => write!(f, "no commit on the branch references an issue"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconOutcome {
  Report(Box<ReleaseReport>),
  NothingToReport(NothingReason),
}

/// Outcome of a run together with the sets and the event trail behind it
#[derive(Debug, Clone)]
pub struct Reconciliation {
  pub result: ReconciliationResult,
  pub outcome: ReconOutcome,
  pub events: Vec<ReconEvent>,
}

/// Builds the release report from already-fetched records
#[derive(Debug)]
pub struct Reconciler<'a> {
  config: &'a ReconConfig,
  extractor: IssueKeyExtractor,
}

/// Earliest start date among in-scope issues, for versions that carry none
fn earliest_issue_start(issues: &[IssueRecord], scope: &BTreeSet<String>) -> Option<NaiveDate> {
  issues
    .iter()
    .filter(|issue| scope.contains(&issue.key))
    .filter_map(|issue| issue.start_date)
    .min()
}

impl<'a> Reconciler<'a> {
  pub fn new(config: &'a ReconConfig) -> ReconResult<Self> {
    let extractor = IssueKeyExtractor::new(&config.policy.merge_commit_pattern)?;
    Ok(Self { config, extractor })
  }

  pub fn reconcile(
    &self,
    release: &ReleaseVersion,
    issues: &[IssueRecord],
    commits: &[CommitRecord],
    today: NaiveDate,
  ) -> Reconciliation {
    let policy = &self.config.policy;
    let mut events = vec![ReconEvent::ReleaseResolved {
      version: self.config.release_version.clone(),
      release_id: release.id.clone(),
      release_name: release.name.clone(),
    }];

    let classified = classify_issues(issues, &policy.release_instruction_label, &policy.closed_status_id);
    events.push(ReconEvent::IssuesClassified {
      total: issues.len(),
      in_scope: classified.issues.len(),
      open: classified.open_issues.len(),
      release_instruction: classified.release_instruction.clone(),
    });
    if let Some(kept) = &classified.release_instruction
      && !classified.extra_instructions.is_empty()
    {
      events.push(ReconEvent::DuplicateReleaseInstruction {
        kept: kept.clone(),
        ignored: classified.extra_instructions.clone(),
      });
    }

    let commit_keys = self.extractor.extract(commits);
    events.push(ReconEvent::CommitsScanned {
      total: commits.len(),
      merges_skipped: commit_keys.merges_skipped,
      issue_keys: commit_keys.issue_keys.len(),
      without_issue: commit_keys.commits_without_issue.len(),
    });

    let result = ReconciliationResult {
      issues: classified.issues.clone(),
      open_issues: classified.open_issues.clone(),
      release_instruction: classified.release_instruction.clone(),
      commit_issue_keys: commit_keys.issue_keys.clone(),
      commits_without_issue: commit_keys.commits_without_issue.clone(),
    };

    let nothing = if result.issues.is_empty() {
      Some(NothingReason::NoReleaseIssues)
    } else if result.commit_issue_keys.is_empty() {
      Some(NothingReason::NoCommitIssueKeys)
    } else {
      None
    };
    if let Some(reason) = nothing {
      events.push(ReconEvent::NothingToReport {
        reason: reason.to_string(),
      });
      return Reconciliation {
        result,
        outcome: ReconOutcome::NothingToReport(reason),
        events,
      };
    }

    let diff = diff_keys(&result.issues, &result.commit_issue_keys, &policy.excluded_key_marker);
    events.push(ReconEvent::KeysCompared {
      missing_from_commits: diff.missing_from_commits.iter().cloned().collect(),
      unscoped: diff.unscoped.iter().chain(diff.excluded.iter()).cloned().collect(),
    });
    if !diff.excluded.is_empty() {
      events.push(ReconEvent::UnscopedExcluded {
        marker: policy.excluded_key_marker.clone(),
        keys: diff.excluded.iter().cloned().collect(),
      });
    }

    let release_date = release.start_date.or_else(|| earliest_issue_start(issues, &result.issues));
    let report = self.build_report(release, release_date, &classified, &commit_keys, &diff, today);
    Reconciliation {
      result,
      outcome: ReconOutcome::Report(Box::new(report)),
      events,
    }
  }

  fn build_report(
    &self,
    release: &ReleaseVersion,
    release_date: Option<NaiveDate>,
    classified: &ClassifiedIssues,
    commit_keys: &CommitKeys,
    diff: &KeyDiff,
    today: NaiveDate,
  ) -> ReleaseReport {
    let config = self.config;
    let absent = &config.policy.absent_placeholder;
    let links = ReportLinks::new(&config.gitlab.url, &config.gitlab.project_path, &config.branch);

    let summary_of = |key: &String| classified.summaries.get(key).cloned().unwrap_or_default();

    ReleaseReport {
      report_date: today.format(REPORT_DATE_FORMAT).to_string(),
      release_version: config.release_version.clone(),
      project_name: config.project_name.clone(),
      release_id: release.id.clone(),
      release_name: release.name.clone(),
      release_date: release_date
        .map(|d| d.format(REPORT_DATE_FORMAT).to_string())
        .unwrap_or_else(|| absent.clone()),
      branch: config.branch.clone(),
      dst_branch: config.dst_branch.clone(),
      release_instruction: classified.release_instruction.clone().unwrap_or_else(|| absent.clone()),
      performer_name: classified.performer.clone().unwrap_or_else(|| absent.clone()),
      issue_titles: classified.summaries.clone(),
      missing_from_commits: diff
        .missing_from_commits
        .iter()
        .map(|key| (key.clone(), summary_of(key)))
        .collect(),
      open_issues: classified.open_issues.iter().cloned().collect(),
      unscoped_issue_urls: diff
        .unscoped
        .iter()
        .map(|key| (key.clone(), links.commit_search(key)))
        .collect::<BTreeMap<_, _>>(),
      commits_without_issue_urls: commit_keys
        .commits_without_issue
        .iter()
        .map(|id| (id.clone(), links.commit(id)))
        .collect(),
    }
  }
}
