//! Run context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ReconContext::build(settings) -> &ReconContext
//!   |
//!   v
//! commands/report.rs, versions.rs:
//!   fn run_*(ctx: &ReconContext, ..)
//! ```

use crate::core::config::{ReconConfig, ReconPolicy, Settings};
use crate::core::error::ReconResult;
use crate::remote::gitlab::GitLabClient;
use crate::remote::jira::JiraClient;
use crate::remote::{CommitSource, IssueTracker};
use std::path::Path;

/// Validated config plus the remote collaborators built from it.
///
/// Commands only see the collaborator traits, so tests can swap in
/// in-memory implementations.
pub struct ReconContext {
  pub config: ReconConfig,
  pub tracker: Box<dyn IssueTracker>,
  pub vcs: Box<dyn CommitSource>,
}

impl ReconContext {
  /// Load policy, validate settings and build the Jira/GitLab clients.
  ///
  /// Fails before any network call if configuration is incomplete.
  pub fn build(settings: Settings, search_root: &Path) -> ReconResult<Self> {
    let (policy, policy_path) = ReconPolicy::load(settings.config.as_deref(), search_root)?;
    if let Some(path) = &policy_path {
      tracing::debug!(path = %path.display(), "loaded policy file");
    }

    let config = ReconConfig::from_settings(settings, policy)?;
    let tracker = JiraClient::new(
      &config.jira,
      &config.policy.http,
      config.policy.issue_start_date_field.clone(),
    )?;
    let vcs = GitLabClient::new(&config.gitlab, &config.policy.http)?;

    Ok(Self::with_collaborators(config, Box::new(tracker), Box::new(vcs)))
  }

  pub fn with_collaborators(
    config: ReconConfig,
    tracker: Box<dyn IssueTracker>,
    vcs: Box<dyn CommitSource>,
  ) -> Self {
    Self { config, tracker, vcs }
  }
}
