//! Polling check runs until every required check has finished
//!
//! # State machine
//!
//! ```text
//!            +---------- sample not complete, interval elapsed --------+
//!            v                                                         |
//!   start -> sampling --- every required check terminal ---> completed |
//!            |   ^----------------------------------------------------+
//!            +--- timeout elapsed ---> timed-out
//! ```
//!
//! The first sample is taken immediately, so even a timeout shorter than the
//! interval observes the checks at least once. Samples never overlap: the
//! interval delay only starts once the previous sample has returned. The
//! timeout races both the in-flight sample and the interval delay, and wins a
//! tie, so completion is only declared from a sample observed before the
//! deadline. Both timers are dropped when [`CheckSuitePoller::poll`] returns.
//!
//! The poller answers "are we done waiting", never "did it pass"; judging
//! conclusions is left to the caller.

use super::RequiredCheckSet;
use super::evaluate::{CheckSummary, all_required_terminal, summarize};
use crate::constants::poll::{DEFAULT_INTERVAL_SECS, DEFAULT_SLEEP_SECS, DEFAULT_TIMEOUT_SECS};
use crate::github::{BranchRef, CheckRun, GitHubError, ProtectionApi};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Timing for one polling operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// How long to wait for checks before giving up
    pub timeout: Duration,
    /// Delay between the end of one sample and the start of the next
    pub interval: Duration,
    /// Delay before the first sample; not counted against `timeout`
    pub initial_delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            initial_delay: Duration::from_secs(DEFAULT_SLEEP_SECS),
        }
    }
}

/// Checks finished before the timeout
#[derive(Debug, Clone)]
pub struct PollReport {
    /// The completing sample, including runs that are not required
    pub check_runs: Vec<CheckRun>,
    pub samples: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error(
        "timed out after {}s ({samples} samples) waiting for required checks: {summary}",
        .elapsed.as_secs()
    )]
    Timeout {
        elapsed: Duration,
        samples: u32,
        /// Built from the last observed sample
        summary: CheckSummary,
    },

    #[error("failed to read check runs after {samples} samples")]
    Api {
        samples: u32,
        #[source]
        source: GitHubError,
    },
}

/// Transient state owned by one call to [`CheckSuitePoller::poll`]
#[derive(Debug, Default)]
struct PollState {
    last_seen: Vec<CheckRun>,
    samples: u32,
}

/// Waits for the required checks on one ref
pub struct CheckSuitePoller<'a> {
    api: &'a dyn ProtectionApi,
    branch: &'a BranchRef,
    required: &'a RequiredCheckSet,
    settings: PollSettings,
}

impl<'a> CheckSuitePoller<'a> {
    pub fn new(
        api: &'a dyn ProtectionApi,
        branch: &'a BranchRef,
        required: &'a RequiredCheckSet,
        settings: PollSettings,
    ) -> Self {
        Self {
            api,
            branch,
            required,
            settings,
        }
    }

    pub async fn poll(&self) -> Result<PollReport, PollError> {
        if !self.settings.initial_delay.is_zero() {
            debug!(
                delay_secs = self.settings.initial_delay.as_secs(),
                "Waiting before first check sample"
            );
            sleep(self.settings.initial_delay).await;
        }

        let started = Instant::now();
        let deadline = sleep(self.settings.timeout);
        tokio::pin!(deadline);

        let mut state = PollState::default();

        loop {
            let sample = tokio::select! {
                biased;
                _ = &mut deadline => break,
                sample = self.api.check_runs_for_ref(self.branch) => sample,
            };
            state.samples += 1;

            match sample {
                Ok(runs) => {
                    if all_required_terminal(self.required, &runs) {
                        info!(
                            samples = state.samples,
                            elapsed_secs = started.elapsed().as_secs(),
                            "All required checks finished"
                        );
                        return Ok(PollReport {
                            check_runs: runs,
                            samples: state.samples,
                            elapsed: started.elapsed(),
                        });
                    }
                    let summary = summarize(self.required, &runs);
                    info!(
                        sample = state.samples,
                        waiting_on = ?summary.outstanding(),
                        "Required checks still running"
                    );
                    state.last_seen = runs;
                }
                Err(e) if e.is_retryable() => {
                    debug!(sample = state.samples, error = %e, "Ref not visible to checks API yet");
                }
                Err(source) => {
                    return Err(PollError::Api {
                        samples: state.samples,
                        source,
                    });
                }
            }

            tokio::select! {
                biased;
                _ = &mut deadline => break,
                _ = sleep(self.settings.interval) => {}
            }
        }

        let summary = summarize(self.required, &state.last_seen);
        warn!(
            samples = state.samples,
            still_waiting = ?summary.outstanding(),
            "Timed out waiting for required checks"
        );
        Err(PollError::Timeout {
            elapsed: started.elapsed(),
            samples: state.samples,
            summary,
        })
    }
}
