//! Error types for release-recon with contextual messages and exit codes
//!
//! Errors are grouped by where they come from (configuration, release lookup,
//! remote APIs) so `main` can pick an exit code and print a hint without
//! inspecting message text.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-recon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (missing configuration, bad branch, unknown release)
  User = 1,
  /// System error (network, remote API, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-recon
#[derive(Debug)]
pub enum ReconError {
  /// Configuration errors
  Config(ConfigError),

  /// Release version lookup errors
  Release(ReleaseError),

  /// Tracker / VCS API errors
  Remote(RemoteError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message { message: String, context: Option<String> },
}

impl ReconError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReconError::Message {
      message: msg.into(),
      context: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReconError::Message { message, context } => ReconError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      ReconError::Io(e) => ReconError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReconError::Config(_) => ExitCode::User,
      ReconError::Release(_) => ExitCode::User,
      ReconError::Remote(_) => ExitCode::System,
      ReconError::Io(_) => ExitCode::System,
      ReconError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReconError::Config(e) => e.help_message(),
      ReconError::Release(e) => e.help_message(),
      ReconError::Remote(e) => e.help_message(),
      ReconError::Message { .. } | ReconError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReconError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReconError::Config(e) => write!(f, "{}", e),
      ReconError::Release(e) => write!(f, "{}", e),
      ReconError::Remote(e) => write!(f, "{}", e),
      ReconError::Io(e) => write!(f, "I/O error: {}", e),
      ReconError::Message { message, context } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReconError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReconError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReconError {
  fn from(err: io::Error) -> Self {
    ReconError::Io(err)
  }
}

impl From<ConfigError> for ReconError {
  fn from(err: ConfigError) -> Self {
    ReconError::Config(err)
  }
}

impl From<ReleaseError> for ReconError {
  fn from(err: ReleaseError) -> Self {
    ReconError::Release(err)
  }
}

impl From<RemoteError> for ReconError {
  fn from(err: RemoteError) -> Self {
    ReconError::Remote(err)
  }
}

impl From<serde_json::Error> for ReconError {
  fn from(err: serde_json::Error) -> Self {
    ReconError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for ReconError {
  fn from(err: regex::Error) -> Self {
    ReconError::message(format!("Invalid pattern: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// One or more required settings were not provided (flag or env var)
  Missing { names: Vec<String> },

  /// Branch name carries no `X.Y.Z` release version
  InvalidBranch { branch: String },

  /// Explicit policy file path does not exist
  NotFound { path: PathBuf },

  /// Policy file parsed but holds unusable values
  InvalidPolicy { path: PathBuf, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Missing { .. } => Some(
        "Export the variables in the CI job or pass the matching flags. Run `release-recon report --help` for the full list."
          .to_string(),
      ),
      ConfigError::InvalidBranch { .. } => {
        Some("Run from a release branch such as `release/2.14.0`, or pass --branch explicitly.".to_string())
      }
      ConfigError::NotFound { .. } => Some("Check the --config path or unset RECON_CONFIG.".to_string()),
      ConfigError::InvalidPolicy { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Missing { names } => {
        write!(f, "Environment variable not set: {}", names.join(", "))
      }
      ConfigError::InvalidBranch { branch } => {
        write!(f, "Branch '{}' does not contain a release version (expected X.Y.Z)", branch)
      }
      ConfigError::NotFound { path } => {
        write!(f, "Policy file not found: {}", path.display())
      }
      ConfigError::InvalidPolicy { path, reason } => {
        write!(f, "Invalid policy in {}: {}", path.display(), reason)
      }
    }
  }
}

/// Release version lookup errors
#[derive(Debug)]
pub enum ReleaseError {
  /// No tracker version named `<project> <version>`
  NotFound { version: String, project: String },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::NotFound { .. } => {
        Some("Run `release-recon versions` to see which tracker versions match this project.".to_string())
      }
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::NotFound { version, project } => {
        write!(f, "Release version not found: '{} {}'", project, version)
      }
    }
  }
}

/// Tracker / VCS API errors
#[derive(Debug)]
pub enum RemoteError {
  /// Request never produced a response
  Network { service: String, message: String },

  /// Credentials rejected (401/403)
  Auth { service: String, status: u16 },

  /// Non-success HTTP status
  Http { service: String, status: u16, body: String },

  /// Response body did not match the expected shape
  Decode { service: String, message: String },
}

impl RemoteError {
  fn help_message(&self) -> Option<String> {
    match self {
      RemoteError::Auth { service, .. } if service == "Jira" => {
        Some("Check JIRA_LOGIN / JIRA_PASSWORD and that the account can browse the project.".to_string())
      }
      RemoteError::Auth { .. } => Some("Check GITLAB_TOKEN has the read_api scope.".to_string()),
      RemoteError::Network { .. } => Some("Check JIRA_URL / CI_SERVER_URL and network access from the runner.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteError::Network { service, message } => write!(f, "{} network error: {}", service, message),
      RemoteError::Auth { service, status } => write!(f, "{} auth failed ({})", service, status),
      RemoteError::Http { service, status, body } => {
        write!(f, "{} error (HTTP {})", service, status)?;
        if !body.is_empty() {
          write!(f, ": {}", body)?;
        }
        Ok(())
      }
      RemoteError::Decode { service, message } => write!(f, "{} response could not be decoded: {}", service, message),
    }
  }
}

/// Result type alias for release-recon
pub type ReconResult<T> = Result<T, ReconError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReconResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReconResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReconError>,
{
  fn context(self, ctx: impl Into<String>) -> ReconResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReconResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReconError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
