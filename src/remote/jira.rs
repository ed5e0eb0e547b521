//! Jira REST v2 client (basic auth, blocking)

use crate::core::config::{HttpPolicy, JiraSettings};
use crate::core::error::{ReconResult, RemoteError};
use crate::recon::model::{IssueRecord, ReleaseVersion};
use crate::remote::IssueTracker;
use crate::remote::http::RetryingClient;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Jira caps a search page at 100 issues
const PAGE_SIZE: usize = 100;

const BASE_FIELDS: &str = "summary,labels,status,assignee";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraVersion {
  id: String,
  name: String,
  #[serde(default)]
  start_date: Option<NaiveDate>,
  #[serde(default)]
  release_date: Option<NaiveDate>,
  #[serde(default)]
  released: bool,
  #[serde(default)]
  archived: bool,
}

impl From<JiraVersion> for ReleaseVersion {
  fn from(v: JiraVersion) -> Self {
    ReleaseVersion {
      id: v.id,
      name: v.name,
      start_date: v.start_date,
      release_date: v.release_date,
      released: v.released,
      archived: v.archived,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
  #[serde(default)]
  total: usize,
  #[serde(default)]
  issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
  key: String,
  fields: JiraFields,
}

#[derive(Debug, Deserialize)]
struct JiraFields {
  #[serde(default)]
  summary: String,
  #[serde(default)]
  labels: BTreeSet<String>,
  status: Option<JiraStatus>,
  assignee: Option<JiraUser>,
  #[serde(flatten)]
  extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JiraStatus {
  id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraUser {
  display_name: Option<String>,
  name: Option<String>,
}

pub struct JiraClient {
  client: RetryingClient,
  base_url: String,
  login: String,
  password: SecretString,
  start_date_field: Option<String>,
}

impl JiraClient {
  pub fn new(settings: &JiraSettings, http: &HttpPolicy, start_date_field: Option<String>) -> ReconResult<Self> {
    Ok(Self {
      client: RetryingClient::new("Jira", http)?,
      base_url: settings.url.clone(),
      login: settings.login.clone(),
      password: SecretString::from(settings.password.expose_secret()),
      start_date_field,
    })
  }

  fn fields(&self) -> String {
    match &self.start_date_field {
      Some(field) => format!("{},{}", BASE_FIELDS, field),
      None => BASE_FIELDS.to_string(),
    }
  }

  fn to_record(&self, issue: JiraIssue) -> IssueRecord {
    let JiraIssue { key, fields } = issue;
    let start_date = self
      .start_date_field
      .as_ref()
      .and_then(|field| fields.extra.get(field))
      .and_then(|v| v.as_str())
      .and_then(parse_jira_date);

    IssueRecord {
      key,
      summary: fields.summary,
      labels: fields.labels,
      status_id: fields.status.map(|s| s.id).unwrap_or_default(),
      start_date,
      assignee: fields.assignee.and_then(|u| u.display_name.or(u.name)),
    }
  }
}

/// Jira date fields are `YYYY-MM-DD`, datetime fields start with it
fn parse_jira_date(value: &str) -> Option<NaiveDate> {
  let date = value.get(..10)?;
  NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

impl IssueTracker for JiraClient {
  fn project_versions(&self, project: &str) -> ReconResult<Vec<ReleaseVersion>> {
    let url = format!(
      "{}/rest/api/2/project/{}/versions",
      self.base_url,
      crate::utils::encode_path_segment(project)
    );
    tracing::debug!(%url, "fetching project versions");

    let versions: Vec<JiraVersion> = self
      .client
      .get_json(|http| http.get(&url).basic_auth(&self.login, Some(self.password.expose_secret())))?;
    Ok(versions.into_iter().map(ReleaseVersion::from).collect())
  }

  fn search_issues(&self, jql: &str, max_results: usize) -> ReconResult<Vec<IssueRecord>> {
    let url = format!("{}/rest/api/2/search", self.base_url);
    let fields = self.fields();
    let mut records = Vec::new();

    while records.len() < max_results {
      let start_at = records.len();
      let page_size = PAGE_SIZE.min(max_results - start_at);
      let params = [
        ("jql", jql.to_string()),
        ("startAt", start_at.to_string()),
        ("maxResults", page_size.to_string()),
        ("fields", fields.clone()),
      ];
      tracing::debug!(%jql, start_at, page_size, "searching issues");

      let page: SearchPage = self.client.get_json(|http| {
        http
          .get(&url)
          .basic_auth(&self.login, Some(self.password.expose_secret()))
          .query(&params)
      })?;

      if page.issues.is_empty() {
        break;
      }
      if page.issues.len() > page_size {
        return Err(
          RemoteError::Decode {
            service: self.client.service().to_string(),
            message: format!("asked for {} issues, got {}", page_size, page.issues.len()),
          }
          .into(),
        );
      }

      let total = page.total;
      records.extend(page.issues.into_iter().map(|issue| self.to_record(issue)));
      if records.len() >= total {
        break;
      }
    }

    Ok(records)
  }
}
