//! Common git utilities and shared helpers
//!
//! Every git invocation goes through [`run_git`], which runs the system `git`
//! binary in the repository directory and turns a non-zero exit into a
//! [`GitError`] carrying git's stderr.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from local git commands
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to execute git {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected output from git {command}: '{output}'")]
    UnexpectedOutput { command: String, output: String },
}

/// Run `git <args>` in `repo_path` and return its trimmed stdout
///
/// `envs` are added to the child's environment. Terminal prompts are
/// disabled so a missing credential fails instead of hanging the run.
pub async fn run_git(
    repo_path: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Result<String, GitError> {
    let command = args.first().copied().unwrap_or_default().to_string();
    debug!(args = ?args, "Running git");

    let output = Command::new("git")
        .args(args)
        .envs(envs.iter().copied())
        .env("GIT_TERMINAL_PROMPT", "0")
        .current_dir(repo_path)
        .output()
        .await
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(GitError::Failed { command, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_git_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let err = run_git(dir.path(), &["rev-parse", "HEAD"], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GitError::Failed { ref command, .. } if command == "rev-parse"));
    }

    #[tokio::test]
    async fn test_run_git_returns_trimmed_stdout() {
        let dir = TempDir::new().unwrap();
        let out = run_git(dir.path(), &["--version"], &[]).await.unwrap();
        assert!(out.starts_with("git version"));
        assert!(!out.ends_with('\n'));
    }
}
