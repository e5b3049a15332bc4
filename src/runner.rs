//! Landing commits on a protected branch
//!
//! [`PushRunner::run`] walks a fixed sequence of gates. Each gate either
//! passes or ends the run with its own [`RunOutcome`]:
//!
//! 1. the path is a git work tree
//! 2. uncommitted changes are committed when asked to
//! 3. `origin` is fetched
//! 4. the target branch exists
//! 5. HEAD is ahead of the target
//! 6. the target's required checks are read
//! 7. at least one check is required
//! 8. a temporary branch is created at HEAD
//! 9. the temporary branch is pushed
//! 10. the required checks finish on the temporary branch
//! 11. every required check succeeded
//! 12. the target is fast-forwarded to the temporary branch and pushed
//!
//! Once step 9 has pushed the temporary branch it is deleted from GitHub
//! whatever happens next, including a panic in steps 10 to 12. The local copy
//! is deleted only after a successful fast-forward; on failure it stays
//! checked out.

use crate::checks::{CheckSuitePoller, PollError, PollSettings, RequiredCheckSet, summarize};
use crate::config::{PushConfig, RepoSlug};
use crate::constants::git::{REMOTE, TEMP_BRANCH_PREFIX};
use crate::git::{self, CommitRequest, Workspace};
use crate::github::{BranchRef, CheckRun, DeleteOutcome, ProtectionApi};
use crate::outcome::{RunFailure, RunOutcome, attempt};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::{AssertUnwindSafe, resume_unwind};
use tracing::{Instrument, debug, info, info_span, warn};

/// Name of the disposable branch pushed for status checks
pub fn temporary_branch_name(run_id: &str, now: DateTime<Utc>) -> String {
    format!("{TEMP_BRANCH_PREFIX}/{run_id}/{}", now.timestamp_millis())
}

/// Everything one run needs to know
#[derive(Clone)]
pub struct RunOptions {
    /// `None` derives the repository from the `origin` remote
    pub repository: Option<RepoSlug>,
    pub target: String,
    pub token: String,
    pub run_id: String,
    pub commit: Option<CommitRequest>,
    pub poll: PollSettings,
}

impl RunOptions {
    pub fn from_config(config: &PushConfig) -> Self {
        Self {
            repository: config.repository.clone(),
            target: config.branch.clone(),
            token: config.token.clone(),
            run_id: config.run_id.clone(),
            commit: config.commit.clone(),
            poll: config.poll,
        }
    }
}

/// What a successful run did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub target: String,
    pub temp_branch: String,
    /// Commit made on the caller's behalf, if any
    pub commit: Option<String>,
    /// Commit the target now points at
    pub head: String,
    /// Sample that completed the required checks
    pub check_runs: Vec<CheckRun>,
}

pub struct PushRunner<'a> {
    workspace: &'a mut dyn Workspace,
    api: &'a dyn ProtectionApi,
    options: RunOptions,
}

impl<'a> PushRunner<'a> {
    pub fn new(
        workspace: &'a mut dyn Workspace,
        api: &'a dyn ProtectionApi,
        options: RunOptions,
    ) -> Self {
        Self {
            workspace,
            api,
            options,
        }
    }

    /// Run every gate, naming the temporary branch from the current time
    pub async fn run(&mut self) -> Result<RunReport, RunFailure> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&mut self, now: DateTime<Utc>) -> Result<RunReport, RunFailure> {
        let temp_branch = temporary_branch_name(&self.options.run_id, now);
        let span = info_span!(
            "protected_push",
            target = %self.options.target,
            temp_branch = %temp_branch,
        );
        self.execute(temp_branch).instrument(span).await
    }

    async fn execute(&mut self, temp_branch: String) -> Result<RunReport, RunFailure> {
        let target = self.options.target.clone();

        // 1. repository
        let is_repository = attempt(RunOutcome::NotARepository, self.workspace.is_repository()).await?;
        if !is_repository {
            return Err(RunFailure::msg(
                RunOutcome::NotARepository,
                "not inside a git work tree",
            ));
        }
        let target_ref = self.resolve_target().await?;
        let temp_ref = target_ref.sibling(temp_branch.as_str());
        debug!(repository = %target_ref, "Resolved target branch");

        // 2. working tree
        let commit = self.commit_if_dirty().await?;

        // 3. remote sync
        info!("Fetching {REMOTE}");
        attempt(RunOutcome::FetchFailed, self.workspace.fetch()).await?;

        // 4. target exists
        self.ensure_target_exists(&target_ref).await?;

        // 5. ahead of target
        let ahead = attempt(RunOutcome::NotAhead, self.workspace.ahead_count(&target)).await?;
        if ahead == 0 {
            return Err(RunFailure::msg(
                RunOutcome::NotAhead,
                format!("HEAD has no commits that are not already on {REMOTE}/{target}"),
            ));
        }
        info!(ahead, "HEAD is ahead of {REMOTE}/{target}");

        // 6. and 7. required checks
        let names = attempt(
            RunOutcome::ProtectionLookupFailed,
            self.api.required_status_checks(&target_ref),
        )
        .await?;
        let required = RequiredCheckSet::new(names);
        if required.is_empty() {
            return Err(RunFailure::msg(
                RunOutcome::NoChecksRequired,
                format!("branch '{target}' requires no status checks; nothing was pushed"),
            ));
        }
        info!(
            count = required.len(),
            required = ?required.iter().collect::<Vec<_>>(),
            "Read required checks"
        );

        // 8. temporary branch
        attempt(
            RunOutcome::TempBranchCreateFailed,
            self.workspace.checkout_new_branch(&temp_branch),
        )
        .await?;
        let head = attempt(RunOutcome::TempBranchCreateFailed, self.workspace.head()).await?;

        // 9. push it
        attempt(
            RunOutcome::TempBranchPushFailed,
            self.workspace.push(&temp_branch, true),
        )
        .await?;
        info!(head = %head, "Pushed temporary branch");

        // 10. to 12., always followed by cleanup
        let landed = AssertUnwindSafe(self.land(&temp_ref, &required))
            .catch_unwind()
            .await;
        self.cleanup(&temp_ref).await;

        let check_runs = match landed {
            Ok(result) => result?,
            Err(panic) => resume_unwind(panic),
        };

        info!(head = %head, "Fast-forwarded {target}");
        Ok(RunReport {
            target,
            temp_branch,
            commit,
            head,
            check_runs,
        })
    }

    async fn resolve_target(&mut self) -> Result<BranchRef, RunFailure> {
        let slug = match &self.options.repository {
            Some(slug) => slug.clone(),
            None => {
                let url =
                    attempt(RunOutcome::NotARepository, self.workspace.remote_url()).await?;
                RepoSlug::from_remote_url(&url).ok_or_else(|| {
                    RunFailure::msg(
                        RunOutcome::NotARepository,
                        format!(
                            "cannot tell the GitHub repository from {REMOTE} url '{url}'; set --repository"
                        ),
                    )
                })?
            }
        };
        Ok(BranchRef::new(
            slug.owner,
            slug.name,
            self.options.target.as_str(),
            self.options.token.as_str(),
        ))
    }

    async fn commit_if_dirty(&mut self) -> Result<Option<String>, RunFailure> {
        let status = attempt(RunOutcome::NotARepository, self.workspace.status()).await?;
        if status.is_clean() {
            debug!("Working tree is clean");
            return Ok(None);
        }

        match &self.options.commit {
            Some(request) => {
                info!(changes = status.entries.len(), "Committing working tree changes");
                let hash = attempt(
                    RunOutcome::CommitFailed,
                    git::commit(&mut *self.workspace, request),
                )
                .await?;
                Ok(Some(hash))
            }
            None => {
                warn!(
                    changes = status.entries.len(),
                    "Working tree has uncommitted changes; they will not be pushed"
                );
                Ok(None)
            }
        }
    }

    async fn ensure_target_exists(&mut self, target_ref: &BranchRef) -> Result<(), RunFailure> {
        let target = target_ref.branch();
        let branches = attempt(RunOutcome::TargetBranchMissing, self.workspace.branches()).await?;
        let local = format!("refs/heads/{target}");
        let remote = format!("refs/remotes/{REMOTE}/{target}");
        if branches.iter().any(|b| *b == local || *b == remote) {
            return Ok(());
        }

        let detail = match self.api.branch_exists(target_ref).await {
            Ok(true) => format!(
                "branch '{target}' exists on GitHub but not in {REMOTE}; does {REMOTE} point at {}/{}?",
                target_ref.owner(),
                target_ref.repo()
            ),
            Ok(false) => format!("branch '{target}' does not exist"),
            Err(e) => {
                debug!(error = %e, "Could not ask GitHub whether the branch exists");
                format!("branch '{target}' not found locally or on {REMOTE}")
            }
        };
        Err(RunFailure::msg(RunOutcome::TargetBranchMissing, detail))
    }

    /// Wait for checks, judge them, then move the target
    async fn land(
        &mut self,
        temp_ref: &BranchRef,
        required: &RequiredCheckSet,
    ) -> Result<Vec<CheckRun>, RunFailure> {
        let poller = CheckSuitePoller::new(self.api, temp_ref, required, self.options.poll);
        let report = match poller.poll().await {
            Ok(report) => report,
            Err(e @ PollError::Timeout { .. }) => {
                return Err(RunFailure::new(RunOutcome::PollTimeout, e));
            }
            Err(e @ PollError::Api { .. }) => {
                return Err(RunFailure::new(RunOutcome::PollError, e));
            }
        };

        let summary = summarize(required, &report.check_runs);
        if !summary.all_succeeded() {
            let failed: Vec<String> = summary
                .failed
                .iter()
                .map(|check| match check.conclusion {
                    Some(conclusion) => format!("{}: {conclusion}", check.name),
                    None => format!("{}: no conclusion", check.name),
                })
                .collect();
            return Err(RunFailure::msg(
                RunOutcome::RequiredCheckFailed,
                format!("required checks did not succeed: {}", failed.join(", ")),
            ));
        }
        info!(
            samples = report.samples,
            elapsed_secs = report.elapsed.as_secs(),
            "Required checks passed"
        );

        let target = self.options.target.as_str();
        let temp = temp_ref.branch();
        attempt(RunOutcome::FastForwardFailed, self.workspace.checkout(target)).await?;
        attempt(RunOutcome::FastForwardFailed, self.workspace.reset_hard(temp)).await?;
        attempt(RunOutcome::FastForwardFailed, self.workspace.push(target, false)).await?;

        if let Err(e) = self.workspace.delete_branch(temp).await {
            warn!(error = %e, "Failed to delete local temporary branch");
        }

        Ok(report.check_runs)
    }

    async fn cleanup(&self, temp_ref: &BranchRef) {
        match self.api.delete_branch(temp_ref).await {
            Ok(DeleteOutcome::Deleted) => info!("Deleted temporary branch"),
            Ok(DeleteOutcome::NotFound) => warn!("Temporary branch was already gone"),
            Err(e) => warn!(error = %e, "Failed to delete temporary branch"),
        }
    }
}
