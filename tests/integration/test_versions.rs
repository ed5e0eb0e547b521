//! Integration tests for `release-recon versions`

use crate::helpers::{TestEnv, jira_version, stderr, stdout};
use anyhow::Result;
use serde_json::{Value, json};

#[test]
fn test_versions_json_marks_newest_match() -> Result<()> {
  let env = TestEnv::new("release/2.14.0")?;
  let mock = env.mock_versions(json!([
    jira_version("1", "Billing 2.13.0"),
    jira_version("2", "Billing 2.14.0"),
    jira_version("3", "Billing 2.14.0 hotfix"),
  ]));

  let output = env.run(&["versions", "--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  mock.assert();

  let rows: Value = serde_json::from_str(&stdout(&output))?;
  let rows = rows.as_array().cloned().unwrap_or_default();
  let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap_or("")).collect();
  assert_eq!(ids, vec!["3", "2", "1"]);

  let resolving: Vec<_> = rows.iter().filter(|r| r["resolves"] == true).collect();
  assert_eq!(resolving.len(), 1);
  assert_eq!(resolving[0]["id"], "3");
  assert_eq!(rows[2]["number"], "2.13.0");

  Ok(())
}

#[test]
fn test_versions_text_without_match() -> Result<()> {
  let env = TestEnv::new("release/3.0.0")?;
  env.mock_versions(json!([jira_version("1", "Billing 2.13.0")]));

  let output = env.run(&["versions"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let text = stdout(&output);
  assert!(text.contains("Billing 2.13.0"));
  assert!(text.contains("No version named \"Billing 3.0.0\" found"));

  Ok(())
}
