//! GitHub API integration module
//!
//! The runner and poller talk to GitHub through the [`ProtectionApi`] trait.
//! [`push_github::GitHubClient`] is the production implementation; tests
//! substitute an in-memory one.

use async_trait::async_trait;

pub use push_github::{
    BranchRef, CheckConclusion, CheckRun, CheckStatus, DeleteOutcome, GitHubClient, GitHubError,
    parse_github_url,
};

/// The GitHub operations a protected push needs
#[async_trait]
pub trait ProtectionApi: Send + Sync {
    /// Names of the checks the branch's protection rules require
    async fn required_status_checks(&self, branch: &BranchRef) -> Result<Vec<String>, GitHubError>;

    /// Every check run currently reported for the branch head
    async fn check_runs_for_ref(&self, branch: &BranchRef) -> Result<Vec<CheckRun>, GitHubError>;

    async fn branch_exists(&self, branch: &BranchRef) -> Result<bool, GitHubError>;

    /// Delete the branch; an already-missing branch is not an error
    async fn delete_branch(&self, branch: &BranchRef) -> Result<DeleteOutcome, GitHubError>;
}

#[async_trait]
impl ProtectionApi for GitHubClient {
    async fn required_status_checks(&self, branch: &BranchRef) -> Result<Vec<String>, GitHubError> {
        GitHubClient::required_status_checks(self, branch).await
    }

    async fn check_runs_for_ref(&self, branch: &BranchRef) -> Result<Vec<CheckRun>, GitHubError> {
        GitHubClient::check_runs_for_ref(self, branch).await
    }

    async fn branch_exists(&self, branch: &BranchRef) -> Result<bool, GitHubError> {
        GitHubClient::branch_exists(self, branch).await
    }

    async fn delete_branch(&self, branch: &BranchRef) -> Result<DeleteOutcome, GitHubError> {
        GitHubClient::delete_branch(self, branch).await
    }
}
