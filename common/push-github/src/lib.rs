//! GitHub API client library
//!
//! This library provides the small slice of GitHub's REST API needed to land
//! commits on a protected branch: reading required status checks, listing
//! check runs for a ref, checking branch existence and deleting branches.
//!
//! ## Modules
//!
//! - [`client`]: Core GitHub client implementation
//! - [`branches`]: Branch protection, existence and deletion
//! - [`checks`]: Check run listing and wire types
//! - [`error`]: Error classification for API responses
//! - [`util`]: Utility functions for GitHub operations

mod branches;
mod checks;
mod client;
mod error;
mod util;

// Re-export public API
pub use branches::{BranchRef, DeleteOutcome, RequiredStatusChecks, StatusCheck};
pub use checks::{CheckConclusion, CheckRun, CheckStatus};
pub use client::{API_BASE, API_VERSION, DEFAULT_USER_AGENT, GitHubClient};
pub use error::GitHubError;
pub use util::parse_github_url;
