//! Git operations using system git commands for maximum compatibility
//!
//! ## Sub-modules
//!
//! - [`workspace`]: The [`Workspace`] trait the runner drives, and
//!   [`GitWorkspace`], its implementation over the `git` binary
//! - [`commit`]: Committing the working tree on behalf of the caller
//! - [`common`]: The shared `git` runner and [`GitError`]

pub mod commit;
pub mod common;
pub mod workspace;

pub use commit::{CommitError, CommitRequest, commit};
pub use common::{GitError, run_git};
pub use workspace::{GitWorkspace, Identity, TreeStatus, Workspace};
