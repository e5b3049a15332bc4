//! Branch operations: protection lookup, existence and deletion

use crate::client::{GitHubClient, error_message};
use crate::error::GitHubError;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// A branch on GitHub together with the token used to access it
#[derive(Clone, PartialEq, Eq)]
pub struct BranchRef {
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

impl BranchRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
        }
    }

    /// Another branch of the same repository, accessed with the same token
    pub fn sibling(&self, branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..self.clone()
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn repo_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.repo)
    }

    /// The branch name as a single URL path segment
    ///
    /// `/`, `#`, `%` and friends are percent-encoded so they cannot end the
    /// path early or split it.
    pub(crate) fn encoded_branch(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.branch)
    }

    pub(crate) fn branch_path(&self) -> String {
        format!("{}/branches/{}", self.repo_path(), self.encoded_branch())
    }

    pub(crate) fn required_checks_path(&self) -> String {
        format!("{}/protection/required_status_checks", self.branch_path())
    }

    pub(crate) fn head_ref_path(&self) -> String {
        format!("{}/git/refs/heads/{}", self.repo_path(), self.encoded_branch())
    }

    pub(crate) fn check_runs_path(&self) -> String {
        format!("{}/commits/{}/check-runs", self.repo_path(), self.encoded_branch())
    }
}

impl fmt::Debug for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchRef")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Body of `GET .../protection/required_status_checks`
#[derive(Deserialize, Debug, Default)]
pub struct RequiredStatusChecks {
    #[serde(default)]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub checks: Vec<StatusCheck>,
}

#[derive(Deserialize, Debug)]
pub struct StatusCheck {
    pub context: String,
}

impl RequiredStatusChecks {
    /// Required check names in order: `contexts` first, then any `checks`
    /// entry not already listed
    pub fn names(self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.contexts.len());
        for name in self
            .contexts
            .into_iter()
            .chain(self.checks.into_iter().map(|c| c.context))
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Result of deleting a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The branch was already gone
    NotFound,
}

impl GitHubClient {
    /// Names of the status checks required by the branch's protection rules
    ///
    /// # Errors
    /// Returns [`GitHubError::NotFoundOrUnauthorized`] if the branch does not
    /// exist, is not protected, or the token lacks read access. An `Ok` empty
    /// list means the branch is protected but requires no checks.
    pub async fn required_status_checks(
        &self,
        branch: &BranchRef,
    ) -> Result<Vec<String>, GitHubError> {
        let path = branch.required_checks_path();
        let response = self
            .request(Method::GET, &path, branch.token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(GitHubError::from_protection_status(
                status,
                branch.branch(),
                message,
            ));
        }

        let payload: RequiredStatusChecks = response.json().await?;
        let names = payload.names();
        debug!(branch = %branch, checks = ?names, "Fetched required status checks");
        Ok(names)
    }

    /// Whether the branch exists on GitHub
    pub async fn branch_exists(&self, branch: &BranchRef) -> Result<bool, GitHubError> {
        let path = branch.branch_path();
        let response = self
            .request(Method::GET, &path, branch.token())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let message = error_message(response).await;
                Err(GitHubError::from_status(status, message))
            }
        }
    }

    /// Delete a branch
    ///
    /// A branch that is already gone yields [`DeleteOutcome::NotFound`]
    /// rather than an error, so repeated deletion is harmless.
    pub async fn delete_branch(&self, branch: &BranchRef) -> Result<DeleteOutcome, GitHubError> {
        let path = branch.head_ref_path();
        let response = self
            .request(Method::DELETE, &path, branch.token())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            // 422 is "Reference does not exist"
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                Ok(DeleteOutcome::NotFound)
            }
            status => {
                let message = error_message(response).await;
                Err(GitHubError::from_status(status, message))
            }
        }
    }
}
