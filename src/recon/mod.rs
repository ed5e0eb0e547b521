//! Release reconciliation
//!
//! Pure steps over already-fetched records. Nothing here talks to the network
//! or logs; the command layer fetches, calls in, and forwards the returned
//! [`events::ReconEvent`] trail.
//!
//! - **model**: commit, issue and release-version records
//! - **extract**: issue keys referenced by commit titles
//! - **version**: branch version and tracker version lookup
//! - **classify**: release scope, open issues, release instruction
//! - **reconcile**: set differences and report assembly
//! - **events**: structured trail of each run

pub mod classify;
pub mod events;
pub mod extract;
pub mod model;
pub mod reconcile;
pub mod version;

pub use reconcile::{Reconciler, ReconOutcome};
