//! Core plumbing for release-recon
//!
//! - **config**: CLI/env settings, the validated `ReconConfig`, and the recon.toml policy
//! - **context**: config plus remote collaborators, built once in main.rs
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod context;
pub mod error;
