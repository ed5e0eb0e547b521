//! Versions command implementation
//!
//! Lists tracker versions newest first with the number extracted from each
//! name, so a release that cannot be resolved can be diagnosed without
//! reading raw Jira output.

use crate::core::config::ReconConfig;
use crate::core::context::ReconContext;
use crate::core::error::ReconResult;
use crate::recon::model::ReleaseVersion;
use crate::recon::version::VersionNameMatcher;
use serde::Serialize;

/// One tracker version as seen by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRow {
  pub id: String,
  pub name: String,
  /// `X.Y.Z` taken from the name, None when the name is not `<project> X.Y.Z`
  pub number: Option<String>,
  pub start_date: Option<String>,
  pub released: bool,
  pub archived: bool,
  /// This is the version the report would use for the current branch
  pub resolves: bool,
}

/// Rows in resolver order (newest first); at most one row resolves
pub fn version_rows(config: &ReconConfig, versions: &[ReleaseVersion]) -> Vec<VersionRow> {
  let matcher = VersionNameMatcher::new(&config.project_name);
  let mut resolved = false;

  versions
    .iter()
    .rev()
    .map(|v| {
      let number = matcher.number(&v.name).map(str::to_string);
      let resolves = !resolved && number.as_deref() == Some(config.release_version.as_str());
      resolved |= resolves;
      VersionRow {
        id: v.id.clone(),
        name: v.name.clone(),
        number,
        start_date: v.start_date.map(|d| d.to_string()),
        released: v.released,
        archived: v.archived,
        resolves,
      }
    })
    .collect()
}

/// Run the versions command
pub fn run_versions(ctx: &ReconContext, json: bool) -> ReconResult<()> {
  let config = &ctx.config;
  let versions = ctx.tracker.project_versions(&config.jira.project)?;
  let rows = version_rows(config, &versions);
  tracing::debug!(count = rows.len(), "listed tracker versions");

  if json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
    return Ok(());
  }

  println!(
    "📋 Versions of {} (branch {} → {})",
    config.jira.project, config.branch, config.release_version
  );
  println!();

  if rows.is_empty() {
    println!("   (no versions)");
  }
  for row in &rows {
    let marker = if row.resolves { "👉" } else { "  " };
    let number = row.number.as_deref().unwrap_or("-");
    let mut flags = Vec::new();
    if row.released {
      flags.push("released");
    }
    if row.archived {
      flags.push("archived");
    }
    let flags = if flags.is_empty() {
      String::new()
    } else {
      format!(" [{}]", flags.join(", "))
    };
    println!("{} {:>8}  {:<10} {}{}", marker, row.id, number, row.name, flags);
  }

  println!();
  if rows.iter().any(|r| r.resolves) {
    println!("✅ {} resolves to the marked version", config.release_version);
  } else {
    println!(
      "⚠️  No version named \"{} {}\" found",
      config.project_name, config.release_version
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{ReconPolicy, Settings};
  use crate::recon::model::fixtures::version;

  fn config() -> ReconConfig {
    let settings = Settings {
      branch: Some("release/2.0.0".to_string()),
      project_name: Some("Proj".to_string()),
      gitlab_token: Some("token".to_string()),
      jira_login: Some("bot".to_string()),
      jira_password: Some("secret".to_string()),
      jira_url: Some("https://jira.example.com".to_string()),
      jira_project: Some("PRJ".to_string()),
      gitlab_url: Some("https://gitlab.example.com".to_string()),
      gitlab_project_id: Some("7".to_string()),
      gitlab_project_path: Some("team/proj".to_string()),
      dst_branch: "master".to_string(),
      config: None,
    };
    ReconConfig::from_settings(settings, ReconPolicy::default()).unwrap()
  }

  #[test]
  fn test_rows_newest_first_with_single_resolver() {
    let versions = vec![
      version("1", "Proj 1.2.3"),
      version("2", "Proj 2.0.0"),
      version("3", "Other 2.0.0"),
      version("4", "Proj 2.0.0"),
    ];
    let rows = version_rows(&config(), &versions);

    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["4", "3", "2", "1"]);
    let resolving: Vec<_> = rows.iter().filter(|r| r.resolves).map(|r| r.id.as_str()).collect();
    assert_eq!(resolving, vec!["4"]);
    assert_eq!(rows[1].number, None);
    assert_eq!(rows[3].number.as_deref(), Some("1.2.3"));
  }

  #[test]
  fn test_rows_without_match() {
    let versions = vec![version("1", "Proj 1.2.3"), version("2", "Proj 2.0")];
    let rows = version_rows(&config(), &versions);
    assert!(rows.iter().all(|r| !r.resolves));
    assert_eq!(rows[0].number, None);
  }
}
