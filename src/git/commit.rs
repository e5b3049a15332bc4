//! Committing on behalf of the caller

use super::common::GitError;
use super::workspace::{Identity, Workspace};
use thiserror::Error;
use tracing::{debug, info};

/// What to commit and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub message: String,
    /// Forwarded verbatim to `git commit`
    pub extra_args: Vec<String>,
    pub author: Identity,
    pub committer: Identity,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("failed to configure commit identity")]
    Identity(#[source] GitError),

    #[error("failed to stage changes")]
    Stage(#[source] GitError),

    #[error("commit rejected")]
    Commit(#[source] GitError),
}

/// Commit the working tree and return the new commit hash
///
/// The author identity is written into the repository's local config on
/// every call rather than trusted from an earlier run.
pub async fn commit(
    workspace: &mut dyn Workspace,
    request: &CommitRequest,
) -> Result<String, CommitError> {
    debug!(
        author = %request.author.email,
        committer = %request.committer.email,
        "Configuring commit identity"
    );
    workspace
        .set_identity(&request.author)
        .await
        .map_err(CommitError::Identity)?;

    workspace.stage_all().await.map_err(CommitError::Stage)?;

    let hash = workspace
        .commit(&request.message, &request.extra_args, &request.committer)
        .await
        .map_err(CommitError::Commit)?;

    info!(commit = %hash, "Committed working tree changes");
    Ok(hash)
}
