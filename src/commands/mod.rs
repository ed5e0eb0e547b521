//! CLI commands for release-recon
//!
//! - **report**: reconcile release scope against branch commits and print the report
//! - **versions**: list tracker versions and show which one the branch resolves to
//!
//! All commands accept `&ReconContext` so config and clients are built once.

pub mod report;
pub mod versions;

pub use report::run_report;
pub use versions::run_versions;
