//! Report command implementation
//!
//! Fetches in the order tracker versions → release issues → branch commits,
//! then hands the records to the reconciler.

use crate::core::context::ReconContext;
use crate::core::error::ReconResult;
use crate::recon::reconcile::Reconciliation;
use crate::recon::version::resolve_release;
use crate::recon::{ReconOutcome, Reconciler};
use crate::remote::release_jql;
use chrono::NaiveDate;
use std::path::Path;

/// Run the report command
pub fn run_report(ctx: &ReconContext, json: bool, output: Option<&Path>) -> ReconResult<()> {
  let today = chrono::Local::now().date_naive();
  let recon = reconcile_release(ctx, today)?;

  for event in &recon.events {
    event.emit();
  }

  let sets = &recon.result;
  tracing::debug!(
    issues = ?sets.issues,
    open_issues = ?sets.open_issues,
    release_instruction = ?sets.release_instruction,
    commit_issue_keys = ?sets.commit_issue_keys,
    commits_without_issue = ?sets.commits_without_issue,
    "reconciliation sets"
  );

  match recon.outcome {
    ReconOutcome::NothingToReport(reason) => {
      if !json {
        println!("ℹ️  Nothing to report: {}", reason);
      }
      Ok(())
    }
    ReconOutcome::Report(report) => {
      if let Some(path) = output {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "wrote report");
      }

      if json {
        println!("{}", report.to_json()?);
      } else {
        print!("{}", report.render_text());
      }
      Ok(())
    }
  }
}

/// Fetch both sides for the configured release and reconcile them
pub fn reconcile_release(ctx: &ReconContext, today: NaiveDate) -> ReconResult<Reconciliation> {
  let config = &ctx.config;
  tracing::info!(
    branch = %config.branch,
    version = %config.release_version,
    dst_branch = %config.dst_branch,
    "starting reconciliation"
  );

  let versions = ctx.tracker.project_versions(&config.jira.project)?;
  let release = resolve_release(versions.iter().rev(), &config.release_version, &config.project_name)?;

  let jql = release_jql(&config.jira.project, &release.id);
  let issues = ctx.tracker.search_issues(&jql, config.policy.max_results)?;
  tracing::debug!(count = issues.len(), "fetched release issues");

  let commits = ctx.vcs.compare_branches(&config.branch, &config.dst_branch)?;
  tracing::debug!(count = commits.len(), "fetched branch commits");

  let reconciler = Reconciler::new(config)?;
  Ok(reconciler.reconcile(release, &issues, &commits, today))
}
