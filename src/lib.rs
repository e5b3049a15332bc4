//! protected-push - land commits on a branch guarded by required status checks
//!
//! The commits are pushed to a temporary branch first. Once GitHub reports
//! every required check on it as successful, the protected branch is
//! fast-forwarded to the same commit and the temporary branch is deleted.

pub mod checks;
pub mod config;
pub mod constants;
pub mod git;
pub mod github;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use config::{Inputs, PushConfig};
pub use outcome::{RunFailure, RunOutcome};
pub use runner::{PushRunner, RunOptions, RunReport};
