//! Check run listing

use crate::branches::BranchRef;
use crate::client::{GitHubClient, error_message};
use crate::error::GitHubError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Page size used when listing check runs (GitHub's maximum)
const PER_PAGE: usize = 100;

/// Lifecycle state of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

impl CheckStatus {
    /// Only `completed` is terminal
    pub fn is_terminal(self) -> bool {
        self == CheckStatus::Completed
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Queued => "queued",
            CheckStatus::InProgress => "in_progress",
            CheckStatus::Completed => "completed",
            CheckStatus::Waiting => "waiting",
            CheckStatus::Requested => "requested",
            CheckStatus::Pending => "pending",
            CheckStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Failure => "failure",
            CheckConclusion::Neutral => "neutral",
            CheckConclusion::Cancelled => "cancelled",
            CheckConclusion::Skipped => "skipped",
            CheckConclusion::TimedOut => "timed_out",
            CheckConclusion::ActionRequired => "action_required",
            CheckConclusion::Stale => "stale",
            CheckConclusion::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A single check run reported against a ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: CheckStatus,
    /// Only meaningful once `status` is `completed`
    #[serde(default)]
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    pub fn new(name: impl Into<String>, status: CheckStatus, conclusion: Option<CheckConclusion>) -> Self {
        Self {
            name: name.into(),
            status,
            conclusion,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn succeeded(&self) -> bool {
        self.is_terminal() && self.conclusion == Some(CheckConclusion::Success)
    }
}

#[derive(Deserialize, Debug)]
struct CheckRunsPage {
    total_count: usize,
    check_runs: Vec<CheckRun>,
}

impl GitHubClient {
    /// All check runs reported for the branch's head commit
    ///
    /// Pages through the listing until `total_count` runs have been read.
    ///
    /// # Errors
    /// - [`GitHubError::Auth`] when the token is rejected
    /// - [`GitHubError::RefNotReady`] when GitHub cannot resolve the ref yet
    pub async fn check_runs_for_ref(&self, branch: &BranchRef) -> Result<Vec<CheckRun>, GitHubError> {
        let path = branch.check_runs_path();
        let mut runs = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .request(Method::GET, &path, branch.token())
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = error_message(response).await;
                return Err(GitHubError::from_check_runs_status(
                    status,
                    branch.branch(),
                    message,
                ));
            }

            let body: CheckRunsPage = response.json().await?;
            let received = body.check_runs.len();
            runs.extend(body.check_runs);

            if received == 0 || runs.len() >= body.total_count {
                break;
            }
            page += 1;
        }

        debug!(branch = %branch, count = runs.len(), "Fetched check runs");
        Ok(runs)
    }
}
