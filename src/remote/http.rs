//! Blocking JSON client with bounded retry
//!
//! Transport errors, 429 and 5xx are retried with exponential backoff up to
//! `max_retries` extra attempts; a 429 with `Retry-After` seconds waits that
//! long instead. Auth failures and other 4xx fail immediately.

use crate::core::config::HttpPolicy;
use crate::core::error::{ReconResult, RemoteError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;

const USER_AGENT: &str = concat!("release-recon/", env!("CARGO_PKG_VERSION"));

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Clone)]
pub struct RetryingClient {
  http: Client,
  service: &'static str,
  policy: HttpPolicy,
}

impl RetryingClient {
  pub fn new(service: &'static str, policy: &HttpPolicy) -> ReconResult<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(policy.timeout_secs))
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| RemoteError::Network {
        service: service.to_string(),
        message: format!("failed to build HTTP client: {}", e),
      })?;

    Ok(Self {
      http,
      service,
      policy: policy.clone(),
    })
  }

  pub fn service(&self) -> &'static str {
    self.service
  }

  /// Send the request built by `build_request` and decode a JSON body.
  ///
  /// `build_request` runs once per attempt.
  pub fn get_json<T, F>(&self, build_request: F) -> ReconResult<T>
  where
    T: DeserializeOwned,
    F: Fn(&Client) -> RequestBuilder,
  {
    let response = self.send_with_retry(build_request)?;
    response.json::<T>().map_err(|e| {
      RemoteError::Decode {
        service: self.service.to_string(),
        message: e.to_string(),
      }
      .into()
    })
  }

  fn send_with_retry<F>(&self, build_request: F) -> ReconResult<Response>
  where
    F: Fn(&Client) -> RequestBuilder,
  {
    let mut attempt = 0u32;

    loop {
      let result = build_request(&self.http).send();
      let (retryable, retry_after) = match result {
        Ok(resp) => {
          let status = resp.status().as_u16();
          tracing::debug!(service = self.service, status, url = %resp.url(), attempt, "response");

          if resp.status().is_success() {
            return Ok(resp);
          }

          if status == 401 || status == 403 {
            return Err(
              RemoteError::Auth {
                service: self.service.to_string(),
                status,
              }
              .into(),
            );
          }

          let retry_after = if status == 429 { retry_after(&resp) } else { None };
          let body = truncate(resp.text().unwrap_or_default());
          let error = RemoteError::Http {
            service: self.service.to_string(),
            status,
            body,
          };
          if status != 429 && status < 500 {
            return Err(error.into());
          }
          (error, retry_after)
        }
        Err(e) => (
          RemoteError::Network {
            service: self.service.to_string(),
            message: e.to_string(),
          },
          None,
        ),
      };

      if attempt >= self.policy.max_retries {
        return Err(retryable.into());
      }

      let backoff = Duration::from_millis(self.policy.backoff_ms.saturating_mul(1u64 << attempt.min(16)));
      let wait = retry_after.unwrap_or(backoff);
      tracing::warn!(
        service = self.service,
        attempt = attempt + 1,
        max_retries = self.policy.max_retries,
        wait_ms = wait.as_millis() as u64,
        error = %retryable,
        "request failed, retrying"
      );
      thread::sleep(wait);
      attempt += 1;
    }
  }
}

/// Delay requested by a 429 response, when given in seconds
fn retry_after(resp: &Response) -> Option<Duration> {
  resp
    .headers()
    .get(RETRY_AFTER)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.trim().parse::<u64>().ok())
    .map(Duration::from_secs)
}

fn truncate(mut body: String) -> String {
  if body.len() > MAX_ERROR_BODY {
    let mut cut = MAX_ERROR_BODY;
    while !body.is_char_boundary(cut) {
      cut -= 1;
    }
    body.truncate(cut);
    body.push('…');
  }
  body.trim().to_string()
}
