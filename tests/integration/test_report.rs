//! Integration tests for `release-recon report`

use crate::helpers::{TestEnv, gitlab_commit, jira_issue, jira_version, run_release_recon, stderr, stdout};
use anyhow::Result;
use serde_json::{Value, json};

const BRANCH: &str = "release/2.14.0";

fn seed_release(env: &TestEnv) {
  env.mock_versions(json!([
    jira_version("1", "Billing 2.13.0"),
    jira_version("2", "Billing 2.14.0"),
    jira_version("3", "Payments 2.14.0"),
  ]));
  env.mock_issues(
    "2",
    json!([
      jira_issue("BIL-1", "Invoice export", "10057", &[]),
      jira_issue("BIL-2", "Tax rounding", "3", &[]),
      jira_issue("BIL-100", "Deploy notes", "10057", &["ReleaseInstructions"]),
    ]),
  );
  env.mock_compare(json!([
    gitlab_commit("aaa1111", "BIL-1 invoice export"),
    gitlab_commit("bbb2222", "BIL-7 hotfix from another release"),
    gitlab_commit("ccc3333", "cleanup"),
    gitlab_commit("ddd4444", "RFC-12 design doc"),
    gitlab_commit("eee5555", "Merge branch 'BIL-9-feature' into 'release/2.14.0'"),
  ]));
}

#[test]
fn test_report_json() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  seed_release(&env);

  let output = env.run(&["report", "--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let report: Value = serde_json::from_str(&stdout(&output))?;
  let base = env.server.base_url();

  assert_eq!(report["release_version"], "2.14.0");
  assert_eq!(report["release_id"], "2");
  assert_eq!(report["release_name"], "Billing 2.14.0");
  assert_eq!(report["release_instruction"], "BIL-100");
  assert_eq!(report["performer_name"], "Dana Ops");
  assert_eq!(report["release_date"], "01-10-2026");
  assert_eq!(report["dst_branch"], "master");
  assert_eq!(report["missing_from_commits"], json!({ "BIL-2": "Tax rounding" }));
  assert_eq!(report["open_issues"], json!(["BIL-2"]));
  assert_eq!(
    report["unscoped_issue_urls"],
    json!({ "BIL-7": format!("{}/team/billing/commits/{}?search=BIL-7", base, BRANCH) })
  );
  assert_eq!(
    report["commits_without_issue_urls"],
    json!({ "ccc3333": format!("{}/team/billing/-/commit/ccc3333", base) })
  );

  Ok(())
}

#[test]
fn test_report_text_and_output_file() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  seed_release(&env);

  let out_path = env.path.join("report.json");
  let out_arg = out_path.to_string_lossy().into_owned();
  let output = env.run(&["report", "--output", &out_arg])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let text = stdout(&output);
  assert!(text.contains("Release Billing 2.14.0"));
  assert!(text.contains("Issues without commits (1)"));
  assert!(text.contains("BIL-2  Tax rounding"));
  assert!(!text.contains("RFC-12"));

  let written: Value = serde_json::from_str(&std::fs::read_to_string(&out_path)?)?;
  assert_eq!(written["release_id"], "2");

  Ok(())
}

#[test]
fn test_report_nothing_to_report() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  env.mock_versions(json!([jira_version("2", "Billing 2.14.0")]));
  env.mock_issues("2", json!([jira_issue("BIL-1", "Invoice export", "10057", &[])]));
  env.mock_compare(json!([gitlab_commit("ccc3333", "cleanup")]));

  let output = env.run(&["report"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("Nothing to report"));

  Ok(())
}

#[test]
fn test_report_release_not_found() -> Result<()> {
  let env = TestEnv::new("release/9.9.9")?;
  env.mock_versions(json!([jira_version("2", "Billing 2.14.0")]));

  let output = env.run(&["report"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Release version not found: 'Billing 9.9.9'"));
  assert!(err.contains("release-recon versions"));

  Ok(())
}

#[test]
fn test_report_missing_environment() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  let partial: Vec<_> = env
    .env()
    .into_iter()
    .filter(|(name, _)| *name != "JIRA_LOGIN" && *name != "CI_PROJECT_ID")
    .collect();

  let output = run_release_recon(&env.path, &["report"], &partial)?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Environment variable not set: JIRA_LOGIN, CI_PROJECT_ID"));

  Ok(())
}

#[test]
fn test_report_branch_without_version() -> Result<()> {
  let env = TestEnv::new("feature/login")?;

  let output = env.run(&["report"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("does not contain a release version"));

  Ok(())
}

#[test]
fn test_report_auth_failure_is_system_error() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  let versions = env.server.mock(|when, then| {
    when.method(httpmock::Method::GET).path("/rest/api/2/project/BIL/versions");
    then.status(401);
  });

  let output = env.run(&["report"])?;
  versions.assert_calls(1);
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("JIRA_LOGIN"));

  Ok(())
}

#[test]
fn test_report_policy_file_overrides_marker() -> Result<()> {
  let env = TestEnv::new(BRANCH)?;
  env.write_policy(
    r#"
excluded_key_marker = ""
absent_placeholder = "n/a"
"#,
  )?;
  env.mock_versions(json!([jira_version("2", "Billing 2.14.0")]));
  env.mock_issues("2", json!([jira_issue("BIL-1", "Invoice export", "10057", &[])]));
  env.mock_compare(json!([
    gitlab_commit("aaa1111", "BIL-1 invoice export"),
    gitlab_commit("ddd4444", "RFC-12 design doc"),
  ]));

  let output = env.run(&["report", "--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let report: Value = serde_json::from_str(&stdout(&output))?;
  assert!(report["unscoped_issue_urls"].get("RFC-12").is_some());
  assert_eq!(report["release_instruction"], "n/a");
  assert_eq!(report["performer_name"], "n/a");

  Ok(())
}
