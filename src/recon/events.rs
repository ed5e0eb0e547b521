//! Structured trail of what a reconciliation run decided
//!
//! Reconciliation steps stay free of logging. They return these events and the
//! command layer decides where they go (currently `tracing`).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReconEvent {
  ReleaseResolved {
    version: String,
    release_id: String,
    release_name: String,
  },
  CommitsScanned {
    total: usize,
    merges_skipped: usize,
    issue_keys: usize,
    without_issue: usize,
  },
  IssuesClassified {
    total: usize,
    in_scope: usize,
    open: usize,
    release_instruction: Option<String>,
  },
  DuplicateReleaseInstruction {
    kept: String,
    ignored: Vec<String>,
  },
  KeysCompared {
    missing_from_commits: Vec<String>,
    unscoped: Vec<String>,
  },
  UnscopedExcluded {
    marker: String,
    keys: Vec<String>,
  },
  NothingToReport {
    reason: String,
  },
}

impl ReconEvent {
  /// Forward to the tracing subscriber
  pub fn emit(&self) {
    match self {
      ReconEvent::ReleaseResolved {
        version,
        release_id,
        release_name,
      } => tracing::info!(%version, %release_id, %release_name, "resolved release version"),
      ReconEvent::CommitsScanned {
        total,
        merges_skipped,
        issue_keys,
        without_issue,
      } => tracing::info!(
        total,
        merges_skipped,
        issue_keys,
        without_issue,
        "searched commit titles for issue keys"
      ),
      ReconEvent::IssuesClassified {
        total,
        in_scope,
        open,
        release_instruction,
      } => tracing::info!(total, in_scope, open, ?release_instruction, "classified release issues"),
      ReconEvent::DuplicateReleaseInstruction { kept, ignored } => {
        tracing::warn!(%kept, ?ignored, "several release-instruction issues; keeping the first")
      }
      ReconEvent::KeysCompared {
        missing_from_commits,
        unscoped,
      } => tracing::info!(?missing_from_commits, ?unscoped, "compared release scope with commits"),
      ReconEvent::UnscopedExcluded { marker, keys } => {
        tracing::info!(%marker, ?keys, "excluded unscoped keys by marker")
      }
      ReconEvent::NothingToReport { reason } => tracing::info!(%reason, "nothing to report"),
    }
  }
}
