use crate::core::error::{ConfigError, ReconError, ReconResult, ResultExt};
use crate::recon::version::release_version_from_branch;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw settings as provided on the command line or via CI environment variables.
///
/// Everything is optional here so that missing values can be reported together
/// by [`ReconConfig::from_settings`] instead of one at a time by clap.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Settings {
  /// Release branch being checked
  #[arg(long, env = "CI_COMMIT_REF_NAME")]
  pub branch: Option<String>,

  /// Project name as it prefixes tracker version names (e.g. "Billing")
  #[arg(long, env = "CI_PROJECT_NAME")]
  pub project_name: Option<String>,

  /// GitLab access token
  #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
  pub gitlab_token: Option<String>,

  /// Jira login
  #[arg(long, env = "JIRA_LOGIN")]
  pub jira_login: Option<String>,

  /// Jira password or API token
  #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
  pub jira_password: Option<String>,

  /// Jira base URL
  #[arg(long, env = "JIRA_URL")]
  pub jira_url: Option<String>,

  /// Jira project id or key
  #[arg(long, env = "JIRA_PROJECT_ID")]
  pub jira_project: Option<String>,

  /// GitLab base URL
  #[arg(long, env = "CI_SERVER_URL")]
  pub gitlab_url: Option<String>,

  /// GitLab project id
  #[arg(long, env = "CI_PROJECT_ID")]
  pub gitlab_project_id: Option<String>,

  /// GitLab project path (group/project), used for report links
  #[arg(long, env = "CI_PROJECT_PATH")]
  pub gitlab_project_path: Option<String>,

  /// Branch the release branch is compared against
  #[arg(long, env = "DST_BRANCH", default_value = "master")]
  pub dst_branch: String,

  /// Policy file (default: recon.toml, .recon.toml or .config/recon.toml)
  #[arg(long, env = "RECON_CONFIG")]
  pub config: Option<PathBuf>,
}

/// Jira endpoint and credentials; the password stays wrapped until a request is built
#[derive(Debug)]
pub struct JiraSettings {
  pub url: String,
  pub login: String,
  pub password: SecretString,
  pub project: String,
}

#[derive(Debug)]
pub struct GitLabSettings {
  pub url: String,
  pub token: SecretString,
  pub project_id: String,
  pub project_path: String,
}

/// Validated configuration for a reconciliation run.
///
/// Built once at startup and passed by reference; nothing downstream reads
/// the environment.
#[derive(Debug)]
pub struct ReconConfig {
  pub branch: String,
  /// `X.Y.Z` taken from the branch name
  pub release_version: String,
  pub project_name: String,
  pub dst_branch: String,
  pub jira: JiraSettings,
  pub gitlab: GitLabSettings,
  pub policy: ReconPolicy,
}

/// Tunable reconciliation rules, loaded from recon.toml
///
/// # Example
///
/// ```toml
/// release_instruction_label = "ReleaseInstructions"
/// closed_status_id = "10057"
/// excluded_key_marker = "RFC"
/// max_results = 200
///
/// [http]
/// max_retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconPolicy {
  /// Label that marks the release-instruction issue
  pub release_instruction_label: String,

  /// Tracker status id treated as closed
  pub closed_status_id: String,

  /// Unscoped keys containing this substring are left out of the report
  pub excluded_key_marker: String,

  /// Commit titles matching this pattern are ignored entirely
  pub merge_commit_pattern: String,

  /// Upper bound on issues fetched for a release
  pub max_results: usize,

  /// Shown when the release instruction or performer is unknown
  pub absent_placeholder: String,

  /// Issue field holding a start date (Jira Cloud: customfield_10015)
  pub issue_start_date_field: Option<String>,

  pub http: HttpPolicy,
}

impl Default for ReconPolicy {
  fn default() -> Self {
    Self {
      release_instruction_label: "ReleaseInstructions".to_string(),
      closed_status_id: "10057".to_string(),
      excluded_key_marker: "RFC".to_string(),
      merge_commit_pattern: r"^Merge branch\s".to_string(),
      max_results: 100,
      absent_placeholder: "Absent".to_string(),
      issue_start_date_field: None,
      http: HttpPolicy::default(),
    }
  }
}

/// Timeout and bounded-retry settings shared by both remote clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpPolicy {
  pub timeout_secs: u64,
  pub max_retries: u32,
  pub backoff_ms: u64,
}

impl Default for HttpPolicy {
  fn default() -> Self {
    Self {
      timeout_secs: 30,
      max_retries: 2,
      backoff_ms: 500,
    }
  }
}

impl ReconPolicy {
  /// Find policy file in search order: recon.toml, .recon.toml, .config/recon.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("recon.toml"),
      path.join(".recon.toml"),
      path.join(".config").join("recon.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the policy.
  ///
  /// An explicit path must exist. Without one, the search locations under
  /// `search_root` are tried and defaults are used when none exist.
  pub fn load(explicit: Option<&Path>, search_root: &Path) -> ReconResult<(Self, Option<PathBuf>)> {
    let path = match explicit {
      Some(p) if !p.exists() => {
        return Err(ConfigError::NotFound { path: p.to_path_buf() }.into());
      }
      Some(p) => p.to_path_buf(),
      None => match Self::find_config_path(search_root) {
        Some(p) => p,
        None => return Ok((Self::default(), None)),
      },
    };

    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read policy from {}", path.display()))?;
    let policy = Self::parse(&content, &path)?;
    Ok((policy, Some(path)))
  }

  /// Parse and validate policy TOML
  pub fn parse(content: &str, path: &Path) -> ReconResult<Self> {
    let policy: ReconPolicy = toml_edit::de::from_str(content).map_err(|e| ConfigError::InvalidPolicy {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;
    policy.validate(path)?;
    Ok(policy)
  }

  /// Check values that deserialize fine but cannot be used
  pub fn validate(&self, path: &Path) -> ReconResult<()> {
    let invalid = |reason: String| -> ReconError {
      ConfigError::InvalidPolicy {
        path: path.to_path_buf(),
        reason,
      }
      .into()
    };

    if self.release_instruction_label.trim().is_empty() {
      return Err(invalid("release_instruction_label must not be empty".to_string()));
    }

    if self.max_results == 0 {
      return Err(invalid("max_results must be greater than zero".to_string()));
    }

    if self.http.timeout_secs == 0 {
      return Err(invalid("http.timeout_secs must be greater than zero".to_string()));
    }

    if let Err(e) = regex::Regex::new(&self.merge_commit_pattern) {
      return Err(invalid(format!("merge_commit_pattern does not compile: {}", e)));
    }

    Ok(())
  }
}

impl ReconConfig {
  /// Validate raw settings into a config, collecting every missing value
  pub fn from_settings(settings: Settings, policy: ReconPolicy) -> ReconResult<Self> {
    let mut missing = Vec::new();
    let mut take = |value: Option<String>, env: &str| -> String {
      match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
          missing.push(env.to_string());
          String::new()
        }
      }
    };

    let branch = take(settings.branch, "CI_COMMIT_REF_NAME");
    let project_name = take(settings.project_name, "CI_PROJECT_NAME");
    let gitlab_token = take(settings.gitlab_token, "GITLAB_TOKEN");
    let jira_login = take(settings.jira_login, "JIRA_LOGIN");
    let jira_password = take(settings.jira_password, "JIRA_PASSWORD");
    let jira_url = take(settings.jira_url, "JIRA_URL");
    let jira_project = take(settings.jira_project, "JIRA_PROJECT_ID");
    let gitlab_url = take(settings.gitlab_url, "CI_SERVER_URL");
    let gitlab_project_id = take(settings.gitlab_project_id, "CI_PROJECT_ID");
    let gitlab_project_path = take(settings.gitlab_project_path, "CI_PROJECT_PATH");

    if !missing.is_empty() {
      return Err(ConfigError::Missing { names: missing }.into());
    }

    let release_version =
      release_version_from_branch(&branch).ok_or_else(|| ConfigError::InvalidBranch { branch: branch.clone() })?;

    let dst_branch = match settings.dst_branch.trim() {
      "" => "master".to_string(),
      other => other.to_string(),
    };

    Ok(Self {
      branch,
      release_version,
      project_name,
      dst_branch,
      jira: JiraSettings {
        url: crate::utils::trim_base_url(&jira_url),
        login: jira_login,
        password: SecretString::from(jira_password),
        project: jira_project,
      },
      gitlab: GitLabSettings {
        url: crate::utils::trim_base_url(&gitlab_url),
        token: SecretString::from(gitlab_token),
        project_id: gitlab_project_id,
        project_path: gitlab_project_path.trim_matches('/').to_string(),
      },
      policy,
    })
  }
}
