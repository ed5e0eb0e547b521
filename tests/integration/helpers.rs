//! Test helpers for integration tests

use anyhow::{Context, Result};
use httpmock::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const JIRA_PROJECT: &str = "BIL";
pub const GITLAB_PROJECT_ID: &str = "42";

/// A scratch working directory plus a mock server for both remotes
pub struct TestEnv {
  _root: TempDir,
  pub path: PathBuf,
  pub server: MockServer,
  pub branch: String,
}

impl TestEnv {
  /// Working directory for a release branch, no policy file
  pub fn new(branch: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    Ok(Self {
      _root: root,
      path,
      server: MockServer::start(),
      branch: branch.to_string(),
    })
  }

  /// Write a recon.toml into the working directory
  pub fn write_policy(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("recon.toml"), content)?;
    Ok(())
  }

  /// Full CI environment pointing both remotes at the mock server
  pub fn env(&self) -> Vec<(&'static str, String)> {
    vec![
      ("CI_COMMIT_REF_NAME", self.branch.clone()),
      ("CI_PROJECT_NAME", "Billing".to_string()),
      ("GITLAB_TOKEN", "glpat-test".to_string()),
      ("JIRA_LOGIN", "bot".to_string()),
      ("JIRA_PASSWORD", "secret".to_string()),
      ("JIRA_URL", self.server.base_url()),
      ("JIRA_PROJECT_ID", JIRA_PROJECT.to_string()),
      ("CI_SERVER_URL", self.server.base_url()),
      ("CI_PROJECT_ID", GITLAB_PROJECT_ID.to_string()),
      ("CI_PROJECT_PATH", "team/billing".to_string()),
    ]
  }

  /// Mock the version list (oldest first, as Jira returns it)
  pub fn mock_versions(&self, versions: serde_json::Value) -> httpmock::Mock<'_> {
    self.server.mock(|when, then| {
      when
        .method(GET)
        .path(format!("/rest/api/2/project/{}/versions", JIRA_PROJECT));
      then.status(200).json_body(versions);
    })
  }

  /// Mock the issue search for one release id
  pub fn mock_issues(&self, release_id: &str, issues: serde_json::Value) -> httpmock::Mock<'_> {
    let total = issues.as_array().map(|a| a.len()).unwrap_or(0);
    let jql = format!("project = {} AND fixVersion = {}", JIRA_PROJECT, release_id);
    self.server.mock(|when, then| {
      when.method(GET).path("/rest/api/2/search").query_param("jql", jql);
      then.status(200).json_body(serde_json::json!({
        "startAt": 0,
        "maxResults": 100,
        "total": total,
        "issues": issues,
      }));
    })
  }

  /// Mock the branch comparison against master
  pub fn mock_compare(&self, commits: serde_json::Value) -> httpmock::Mock<'_> {
    let branch = self.branch.clone();
    self.server.mock(|when, then| {
      when
        .method(GET)
        .path(format!("/api/v4/projects/{}/repository/compare", GITLAB_PROJECT_ID))
        .header("PRIVATE-TOKEN", "glpat-test")
        .query_param("from", branch)
        .query_param("to", "master");
      then.status(200).json_body(serde_json::json!({ "commits": commits }));
    })
  }

  /// Run the binary with the full CI environment
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_release_recon(&self.path, args, &self.env())
  }
}

/// Jira version JSON
pub fn jira_version(id: &str, name: &str) -> serde_json::Value {
  serde_json::json!({
    "self": format!("https://jira.example.com/rest/api/2/version/{}", id),
    "id": id,
    "name": name,
    "archived": false,
    "released": false,
    "startDate": "2026-10-01",
  })
}

/// Jira issue JSON
pub fn jira_issue(key: &str, summary: &str, status_id: &str, labels: &[&str]) -> serde_json::Value {
  serde_json::json!({
    "key": key,
    "fields": {
      "summary": summary,
      "labels": labels,
      "status": { "id": status_id, "name": "whatever" },
      "assignee": { "displayName": "Dana Ops", "name": "dana" },
    }
  })
}

/// GitLab commit JSON
pub fn gitlab_commit(short_id: &str, title: &str) -> serde_json::Value {
  serde_json::json!({
    "id": format!("{}{}", short_id, "0".repeat(33)),
    "short_id": short_id,
    "title": title,
  })
}

/// Run the release-recon binary with exactly `env` as its environment.
///
/// The environment is cleared first so variables from the CI runner executing
/// the tests cannot leak in. A failing exit status is returned, not turned
/// into an error, so tests can check exit codes.
pub fn run_release_recon(cwd: &Path, args: &[&str], env: &[(&str, String)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-recon");

  Command::new(bin)
    .current_dir(cwd)
    .env_clear()
    .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
    .args(args)
    .output()
    .context("Failed to run release-recon")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
