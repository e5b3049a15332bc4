//! Run outcomes and the step-wrapping helper
//!
//! Every fallible step of a run goes through [`attempt`], which turns the
//! step's own error type into a [`RunFailure`] tagged with the outcome that
//! step aborts with. The runner can then use `?` without losing which gate
//! failed. Panics are not captured and still unwind through the caller.

use std::fmt;
use std::future::Future;

/// Terminal result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Succeeded,
    NotARepository,
    CommitFailed,
    FetchFailed,
    TargetBranchMissing,
    NotAhead,
    ProtectionLookupFailed,
    NoChecksRequired,
    TempBranchCreateFailed,
    TempBranchPushFailed,
    PollTimeout,
    PollError,
    RequiredCheckFailed,
    FastForwardFailed,
}

impl RunOutcome {
    /// Stable identifier used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Succeeded => "succeeded",
            RunOutcome::NotARepository => "not-a-repository",
            RunOutcome::CommitFailed => "commit-failed",
            RunOutcome::FetchFailed => "fetch-failed",
            RunOutcome::TargetBranchMissing => "target-branch-missing",
            RunOutcome::NotAhead => "not-ahead",
            RunOutcome::ProtectionLookupFailed => "protection-lookup-failed",
            RunOutcome::NoChecksRequired => "no-checks-required",
            RunOutcome::TempBranchCreateFailed => "temp-branch-create-failed",
            RunOutcome::TempBranchPushFailed => "temp-branch-push-failed",
            RunOutcome::PollTimeout => "poll-timeout",
            RunOutcome::PollError => "poll-error",
            RunOutcome::RequiredCheckFailed => "required-check-failed",
            RunOutcome::FastForwardFailed => "fast-forward-failed",
        }
    }

    #[cfg(test)]
    pub(crate) fn is_success(self) -> bool {
        self == RunOutcome::Succeeded
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run that stopped before landing its commits
#[derive(Debug)]
pub struct RunFailure {
    pub outcome: RunOutcome,
    pub error: anyhow::Error,
}

impl RunFailure {
    pub fn new(outcome: RunOutcome, error: impl Into<anyhow::Error>) -> Self {
        Self {
            outcome,
            error: error.into(),
        }
    }

    /// Failure that carries only a message
    pub fn msg(outcome: RunOutcome, message: impl fmt::Display) -> Self {
        Self {
            outcome,
            error: anyhow::anyhow!("{message}"),
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.outcome, self.error)
    }
}

impl std::error::Error for RunFailure {}

/// Await a fallible step, tagging its error with the outcome it aborts with
pub async fn attempt<T, E, F>(outcome: RunOutcome, step: F) -> Result<T, RunFailure>
where
    F: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    step.await.map_err(|e| RunFailure::new(outcome, e))
}
