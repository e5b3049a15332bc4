//! Evaluating a sample of check runs against the required set
//!
//! Only runs whose name is in the [`RequiredCheckSet`] are considered. Other
//! runs on the ref never gate completion and never fail a push.

use super::RequiredCheckSet;
use crate::github::{CheckConclusion, CheckRun, CheckStatus};
use std::fmt;

/// The run reported for `name`
///
/// GitHub lists the most recent run first, so a re-run shadows older
/// attempts with the same name.
pub fn find_run<'a>(runs: &'a [CheckRun], name: &str) -> Option<&'a CheckRun> {
    runs.iter().find(|run| run.name == name)
}

/// Whether every required check has a run that reached a terminal status
pub fn all_required_terminal(required: &RequiredCheckSet, runs: &[CheckRun]) -> bool {
    required
        .iter()
        .all(|name| find_run(runs, name).is_some_and(CheckRun::is_terminal))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    pub name: String,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCheck {
    pub name: String,
    pub conclusion: Option<CheckConclusion>,
}

/// Per-check breakdown of one sample, in required-set order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedCheck>,
    pub pending: Vec<PendingCheck>,
    /// Required checks with no run reported at all
    pub missing: Vec<String>,
}

impl CheckSummary {
    /// Every required check has finished, successfully or not
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.missing.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.is_complete() && self.failed.is_empty()
    }

    /// Names of required checks that have not finished yet
    pub fn outstanding(&self) -> Vec<&str> {
        self.pending
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.missing.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for name in &self.succeeded {
            parts.push(format!("{name}: success"));
        }
        for check in &self.failed {
            let conclusion = check
                .conclusion
                .map(|c| c.to_string())
                .unwrap_or_else(|| "no conclusion".to_string());
            parts.push(format!("{}: {}", check.name, conclusion));
        }
        for check in &self.pending {
            parts.push(format!("{}: {}", check.name, check.status));
        }
        for name in &self.missing {
            parts.push(format!("{name}: not reported"));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Break a sample down by required check
pub fn summarize(required: &RequiredCheckSet, runs: &[CheckRun]) -> CheckSummary {
    let mut summary = CheckSummary::default();
    for name in required.iter() {
        match find_run(runs, name) {
            None => summary.missing.push(name.to_string()),
            Some(run) if !run.is_terminal() => summary.pending.push(PendingCheck {
                name: name.to_string(),
                status: run.status,
            }),
            Some(run) if run.succeeded() => summary.succeeded.push(name.to_string()),
            Some(run) => summary.failed.push(FailedCheck {
                name: name.to_string(),
                conclusion: run.conclusion,
            }),
        }
    }
    summary
}
