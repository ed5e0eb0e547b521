//! Release version lookup
//!
//! Tracker versions are named `<project> X.Y.Z` (e.g. `Billing 2.14.0`). The
//! release branch only carries `X.Y.Z`, so the numeric part is extracted from
//! each version name and compared against the branch version.

use crate::core::error::ReleaseError;
use crate::recon::model::ReleaseVersion;
use regex::Regex;
use std::sync::LazyLock;

static BRANCH_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("branch version pattern compiles"));

/// First `X.Y.Z` in a branch name.
///
/// Kept as the literal digits: tracker names are compared as text, so
/// calendar versions like `2024.01.15` must keep their leading zeros.
pub fn release_version_from_branch(branch: &str) -> Option<String> {
  BRANCH_VERSION.find(branch).map(|m| m.as_str().to_string())
}

/// Extracts `X.Y.Z` from version names that start with `<project> `
#[derive(Debug, Clone)]
pub struct VersionNameMatcher {
  pattern: Regex,
}

impl VersionNameMatcher {
  pub fn new(project_name: &str) -> Self {
    let pattern = Regex::new(&format!(r"^{}\s(\d+\.\d+\.\d+)", regex::escape(project_name)))
      .expect("escaped project name always forms a valid pattern");
    Self { pattern }
  }

  /// Numeric portion of a version name, or None for other projects' versions
  pub fn number<'n>(&self, name: &'n str) -> Option<&'n str> {
    self.pattern.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
  }

  pub fn matches(&self, version: &ReleaseVersion, target: &str) -> bool {
    self.number(&version.name) == Some(target)
  }
}

/// Return the first version whose name carries `target`.
///
/// Callers pass versions newest first so the most recent match wins.
pub fn resolve_release<'a, I>(versions: I, target: &str, project_name: &str) -> Result<&'a ReleaseVersion, ReleaseError>
where
  I: IntoIterator<Item = &'a ReleaseVersion>,
{
  let matcher = VersionNameMatcher::new(project_name);
  versions
    .into_iter()
    .find(|v| matcher.matches(v, target))
    .ok_or_else(|| ReleaseError::NotFound {
      version: target.to_string(),
      project: project_name.to_string(),
    })
}
