//! Exit code utilities and mappings

use crate::outcome::RunOutcome;

/// Exit code for invalid configuration, matching clap's usage errors
pub const CONFIG_ERROR: i32 = 2;

/// Process exit code for a run outcome
///
/// Every non-success outcome gets its own code so a calling pipeline can
/// tell them apart without parsing logs.
pub fn exit_code(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Succeeded => 0,
        RunOutcome::NotARepository => 10,
        RunOutcome::CommitFailed => 11,
        RunOutcome::FetchFailed => 12,
        RunOutcome::TargetBranchMissing => 13,
        RunOutcome::NotAhead => 14,
        RunOutcome::ProtectionLookupFailed => 15,
        RunOutcome::NoChecksRequired => 16,
        RunOutcome::TempBranchCreateFailed => 17,
        RunOutcome::TempBranchPushFailed => 18,
        RunOutcome::PollTimeout => 19,
        RunOutcome::PollError => 20,
        RunOutcome::RequiredCheckFailed => 21,
        RunOutcome::FastForwardFailed => 22,
    }
}

/// Get a human-readable description for an exit code
pub fn get_exit_code_description(exit_code: i32) -> &'static str {
    match exit_code {
        0 => "success",
        CONFIG_ERROR => "invalid configuration",
        10 => "not a git repository",
        11 => "commit failed",
        12 => "fetch failed",
        13 => "target branch missing",
        14 => "nothing to push",
        15 => "branch protection lookup failed",
        16 => "no required status checks",
        17 => "temporary branch creation failed",
        18 => "temporary branch push failed",
        19 => "timed out waiting for checks",
        20 => "check polling failed",
        21 => "required check failed",
        22 => "fast-forward failed",
        _ => "error",
    }
}
