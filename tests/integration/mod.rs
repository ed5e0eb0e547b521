//! Integration tests for release-recon
//!
//! Each test starts a mock server playing both Jira and GitLab and drives the
//! release-recon binary against it.

mod helpers;
mod test_report;
mod test_versions;
