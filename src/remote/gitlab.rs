//! GitLab v4 client for branch comparison (token auth, blocking)

use crate::core::config::{GitLabSettings, HttpPolicy};
use crate::core::error::ReconResult;
use crate::recon::model::CommitRecord;
use crate::remote::CommitSource;
use crate::remote::http::RetryingClient;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Compare {
  #[serde(default)]
  commits: Vec<GitLabCommit>,
}

#[derive(Debug, Deserialize)]
struct GitLabCommit {
  id: String,
  short_id: String,
  #[serde(default)]
  title: String,
}

impl From<GitLabCommit> for CommitRecord {
  fn from(c: GitLabCommit) -> Self {
    CommitRecord {
      id: c.id,
      short_id: c.short_id,
      title: c.title,
    }
  }
}

pub struct GitLabClient {
  client: RetryingClient,
  base_url: String,
  token: SecretString,
  project_id: String,
}

impl GitLabClient {
  pub fn new(settings: &GitLabSettings, http: &HttpPolicy) -> ReconResult<Self> {
    Ok(Self {
      client: RetryingClient::new("GitLab", http)?,
      base_url: settings.url.clone(),
      token: SecretString::from(settings.token.expose_secret()),
      project_id: settings.project_id.clone(),
    })
  }
}

impl CommitSource for GitLabClient {
  fn compare_branches(&self, source: &str, dest: &str) -> ReconResult<Vec<CommitRecord>> {
    let url = format!(
      "{}/api/v4/projects/{}/repository/compare",
      self.base_url,
      crate::utils::encode_path_segment(&self.project_id)
    );
    tracing::debug!(%url, from = source, to = dest, "comparing branches");

    let compare: Compare = self.client.get_json(|http| {
      http
        .get(&url)
        .header("PRIVATE-TOKEN", self.token.expose_secret())
        .query(&[("from", source), ("to", dest)])
    })?;

    Ok(compare.commits.into_iter().map(CommitRecord::from).collect())
  }
}
