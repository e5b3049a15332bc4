//! The local repository as a capability
//!
//! The working tree and its config are shared mutable state. Every operation
//! on them takes `&mut self`, so whoever holds the [`Workspace`] has exclusive
//! access for the duration of a run. The runner owns it and lends it to the
//! commit helper explicitly.

use super::common::{GitError, run_git};
use crate::constants::git::REMOTE;
use async_trait::async_trait;
use std::path::PathBuf;

/// Snapshot of `git status --porcelain`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatus {
    pub entries: Vec<String>,
}

impl TreeStatus {
    pub fn from_porcelain(output: &str) -> Self {
        Self {
            entries: output
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Name and e-mail recorded on a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Version-control operations the runner needs from the local repository
#[async_trait]
pub trait Workspace: Send {
    /// Whether the directory is inside a git work tree
    async fn is_repository(&mut self) -> Result<bool, GitError>;

    async fn status(&mut self) -> Result<TreeStatus, GitError>;

    /// URL of the push remote
    async fn remote_url(&mut self) -> Result<String, GitError>;

    /// Write author name and e-mail into the repository's local config
    async fn set_identity(&mut self, author: &Identity) -> Result<(), GitError>;

    /// Stage every change, including untracked files
    async fn stage_all(&mut self) -> Result<(), GitError>;

    /// Commit staged changes and return the new commit hash
    async fn commit(
        &mut self,
        message: &str,
        extra_args: &[String],
        committer: &Identity,
    ) -> Result<String, GitError>;

    async fn fetch(&mut self) -> Result<(), GitError>;

    /// Full ref names of all local and remote-tracking branches
    async fn branches(&mut self) -> Result<Vec<String>, GitError>;

    /// Number of commits HEAD has that `<remote>/<target>` does not
    async fn ahead_count(&mut self, target: &str) -> Result<u32, GitError>;

    /// Create or reset `name` at HEAD and check it out, discarding local changes
    async fn checkout_new_branch(&mut self, name: &str) -> Result<(), GitError>;

    async fn checkout(&mut self, name: &str) -> Result<(), GitError>;

    /// Delete a local branch that is not checked out
    async fn delete_branch(&mut self, name: &str) -> Result<(), GitError>;

    async fn reset_hard(&mut self, target: &str) -> Result<(), GitError>;

    async fn push(&mut self, branch: &str, force: bool) -> Result<(), GitError>;

    async fn head(&mut self) -> Result<String, GitError>;
}

/// [`Workspace`] backed by the system `git` binary
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    path: PathBuf,
}

impl GitWorkspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn git(&self, args: &[&str]) -> Result<String, GitError> {
        run_git(&self.path, args, &[]).await
    }
}

#[async_trait]
impl Workspace for GitWorkspace {
    async fn is_repository(&mut self) -> Result<bool, GitError> {
        if !self.path.is_dir() {
            return Ok(false);
        }
        match self.git(&["rev-parse", "--is-inside-work-tree"]).await {
            Ok(out) => Ok(out == "true"),
            Err(GitError::Failed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn status(&mut self) -> Result<TreeStatus, GitError> {
        let out = self.git(&["status", "--porcelain"]).await?;
        Ok(TreeStatus::from_porcelain(&out))
    }

    async fn remote_url(&mut self) -> Result<String, GitError> {
        self.git(&["remote", "get-url", REMOTE]).await
    }

    async fn set_identity(&mut self, author: &Identity) -> Result<(), GitError> {
        self.git(&["config", "--local", "user.name", &author.name])
            .await?;
        self.git(&["config", "--local", "user.email", &author.email])
            .await?;
        Ok(())
    }

    async fn stage_all(&mut self) -> Result<(), GitError> {
        self.git(&["add", "-A"]).await.map(|_| ())
    }

    async fn commit(
        &mut self,
        message: &str,
        extra_args: &[String],
        committer: &Identity,
    ) -> Result<String, GitError> {
        let mut args = vec!["commit", "-m", message];
        args.extend(extra_args.iter().map(String::as_str));
        run_git(
            &self.path,
            &args,
            &[
                ("GIT_COMMITTER_NAME", committer.name.as_str()),
                ("GIT_COMMITTER_EMAIL", committer.email.as_str()),
            ],
        )
        .await?;
        self.head().await
    }

    async fn fetch(&mut self) -> Result<(), GitError> {
        self.git(&["fetch", "--prune", REMOTE]).await.map(|_| ())
    }

    async fn branches(&mut self) -> Result<Vec<String>, GitError> {
        let out = self
            .git(&["branch", "--all", "--format=%(refname)"])
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn ahead_count(&mut self, target: &str) -> Result<u32, GitError> {
        let range = format!("{REMOTE}/{target}..HEAD");
        let out = self.git(&["rev-list", "--count", &range]).await?;
        out.parse().map_err(|_| GitError::UnexpectedOutput {
            command: "rev-list".to_string(),
            output: out,
        })
    }

    async fn checkout_new_branch(&mut self, name: &str) -> Result<(), GitError> {
        self.git(&["checkout", "-f", "-B", name]).await.map(|_| ())
    }

    async fn checkout(&mut self, name: &str) -> Result<(), GitError> {
        self.git(&["checkout", name]).await.map(|_| ())
    }

    async fn delete_branch(&mut self, name: &str) -> Result<(), GitError> {
        self.git(&["branch", "-D", name]).await.map(|_| ())
    }

    async fn reset_hard(&mut self, target: &str) -> Result<(), GitError> {
        self.git(&["reset", "--hard", target]).await.map(|_| ())
    }

    async fn push(&mut self, branch: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend([REMOTE, branch]);
        self.git(&args).await.map(|_| ())
    }

    async fn head(&mut self) -> Result<String, GitError> {
        self.git(&["rev-parse", "HEAD"]).await
    }
}
