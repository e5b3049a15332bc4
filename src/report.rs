//! Final report of a run
//!
//! [`report_outcome`] is the only place that prints the terminal message and
//! picks the exit code.

use crate::outcome::{RunFailure, RunOutcome};
use crate::runner::RunReport;
use crate::utils::{exit_code, get_exit_code_description};
use colored::*;
use tracing::{error, info};

/// The one-line summary, without colors
pub fn summary_line(result: &Result<RunReport, RunFailure>) -> String {
    match result {
        Ok(report) => {
            let short = report.head.get(..7).unwrap_or(&report.head);
            format!(
                "{}: {} fast-forwarded to {} with {} check run(s) reported",
                RunOutcome::Succeeded,
                report.target,
                short,
                report.check_runs.len()
            )
        }
        Err(failure) => format!(
            "{}: {} (exit {})",
            failure.outcome,
            get_exit_code_description(exit_code(failure.outcome)),
            exit_code(failure.outcome)
        ),
    }
}

/// Print the summary and return the process exit code
pub fn report_outcome(result: &Result<RunReport, RunFailure>) -> i32 {
    let line = summary_line(result);
    match result {
        Ok(report) => {
            info!(
                outcome = %RunOutcome::Succeeded,
                target = %report.target,
                head = %report.head,
                "Run finished"
            );
            println!("{}", line.green().bold());
            0
        }
        Err(failure) => {
            let code = exit_code(failure.outcome);
            let detail = format!("{:#}", failure.error);
            error!(
                outcome = %failure.outcome,
                exit_code = code,
                error = %detail,
                "Run failed"
            );
            eprintln!("{}", line.red().bold());
            eprintln!("{}", format!("Error: {detail}").red());
            code
        }
    }
}
