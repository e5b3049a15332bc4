//! Common test support utilities and fixtures
//!
//! In-memory stand-ins for GitHub and the local repository, plus helpers
//! that build real git repositories with a bare `origin` on disk.

#![allow(dead_code)]

use async_trait::async_trait;
use protected_push::git::{GitError, Identity, TreeStatus, Workspace};
use protected_push::github::{
    BranchRef, CheckConclusion, CheckRun, CheckStatus, DeleteOutcome, GitHubError, ProtectionApi,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tempfile::TempDir;

// =================================
// ===== Check run builders
// =================================

pub fn queued(name: &str) -> CheckRun {
    CheckRun::new(name, CheckStatus::Queued, None)
}

pub fn in_progress(name: &str) -> CheckRun {
    CheckRun::new(name, CheckStatus::InProgress, None)
}

pub fn passed(name: &str) -> CheckRun {
    CheckRun::new(name, CheckStatus::Completed, Some(CheckConclusion::Success))
}

pub fn failed(name: &str) -> CheckRun {
    CheckRun::new(name, CheckStatus::Completed, Some(CheckConclusion::Failure))
}

pub fn branch(name: &str) -> BranchRef {
    BranchRef::new("octo", "widgets", name, "ghs_test_token")
}

// =================================
// ===== Fake GitHub
// =================================

/// One scripted answer to `check_runs_for_ref`
#[derive(Debug, Clone)]
pub enum Sample {
    Runs(Vec<CheckRun>),
    /// GitHub cannot resolve the ref yet (422)
    NotReady,
    /// Token rejected (401)
    Unauthorized,
    /// Answer only after the given delay
    Slow(Duration, Vec<CheckRun>),
    Panic,
}

/// Scripted [`ProtectionApi`]
///
/// Check-run samples are served in order; once the script runs out the last
/// one repeats.
pub struct FakeApi {
    required: Option<Vec<String>>,
    samples: Mutex<VecDeque<Sample>>,
    last: Mutex<Option<Sample>>,
    on_github: bool,
    fail_delete: bool,
    pub required_calls: AtomicU32,
    pub sample_calls: AtomicU32,
    pub required_for: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    delete_calls: AtomicU32,
}

impl FakeApi {
    pub fn new(required: &[&str]) -> Self {
        Self {
            required: Some(required.iter().map(|s| s.to_string()).collect()),
            samples: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            on_github: false,
            fail_delete: false,
            required_calls: AtomicU32::new(0),
            sample_calls: AtomicU32::new(0),
            required_for: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            delete_calls: AtomicU32::new(0),
        }
    }

    /// Protection lookup fails as if the branch were unprotected
    pub fn unprotected() -> Self {
        Self {
            required: None,
            ..Self::new(&[])
        }
    }

    pub fn with_samples(self, samples: Vec<Sample>) -> Self {
        *self.samples.lock().unwrap() = samples.into();
        self
    }

    /// Every sample reports the same runs
    pub fn with_runs(self, runs: Vec<CheckRun>) -> Self {
        self.with_samples(vec![Sample::Runs(runs)])
    }

    pub fn with_branch_on_github(mut self) -> Self {
        self.on_github = true;
        self
    }

    pub fn with_failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn samples_taken(&self) -> u32 {
        self.sample_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn next_sample(&self) -> Sample {
        let next = self.samples.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(sample) => {
                *last = Some(sample.clone());
                sample
            }
            None => last.clone().unwrap_or(Sample::Runs(Vec::new())),
        }
    }
}

#[async_trait]
impl ProtectionApi for FakeApi {
    async fn required_status_checks(&self, branch: &BranchRef) -> Result<Vec<String>, GitHubError> {
        self.required_calls.fetch_add(1, Ordering::SeqCst);
        self.required_for.lock().unwrap().push(branch.to_string());
        self.required
            .clone()
            .ok_or_else(|| GitHubError::NotFoundOrUnauthorized {
                branch: branch.branch().to_string(),
                message: "Branch not protected".to_string(),
            })
    }

    async fn check_runs_for_ref(&self, branch: &BranchRef) -> Result<Vec<CheckRun>, GitHubError> {
        self.sample_calls.fetch_add(1, Ordering::SeqCst);
        match self.next_sample() {
            Sample::Runs(runs) => Ok(runs),
            Sample::NotReady => Err(GitHubError::RefNotReady {
                reference: branch.branch().to_string(),
                message: "No commit found for SHA".to_string(),
            }),
            Sample::Unauthorized => Err(GitHubError::Auth {
                message: "Bad credentials".to_string(),
            }),
            Sample::Slow(delay, runs) => {
                tokio::time::sleep(delay).await;
                Ok(runs)
            }
            Sample::Panic => panic!("check runs exploded"),
        }
    }

    async fn branch_exists(&self, _branch: &BranchRef) -> Result<bool, GitHubError> {
        Ok(self.on_github)
    }

    async fn delete_branch(&self, branch: &BranchRef) -> Result<DeleteOutcome, GitHubError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(GitHubError::Http {
                status: 500,
                message: "Server Error".to_string(),
            });
        }
        let mut deleted = self.deleted.lock().unwrap();
        let name = branch.branch().to_string();
        if deleted.contains(&name) {
            return Ok(DeleteOutcome::NotFound);
        }
        deleted.push(name);
        Ok(DeleteOutcome::Deleted)
    }
}

// =================================
// ===== Fake local repository
// =================================

/// In-memory [`Workspace`] that records every operation
///
/// Operations are recorded as short strings such as `push main` or
/// `checkout_new_branch push-action/42/1700000000000`; any operation listed
/// in `fail_on` fails with a git error instead.
pub struct FakeWorkspace {
    pub is_repo: bool,
    pub dirty: Vec<String>,
    pub remote_url: String,
    pub branches: Vec<String>,
    pub ahead: u32,
    pub head: String,
    pub fail_on: Vec<String>,
    pub ops: Vec<String>,
}

impl Default for FakeWorkspace {
    fn default() -> Self {
        Self {
            is_repo: true,
            dirty: Vec::new(),
            remote_url: "git@github.com:octo/widgets.git".to_string(),
            branches: vec![
                "refs/heads/main".to_string(),
                "refs/remotes/origin/main".to_string(),
            ],
            ahead: 1,
            head: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string(),
            fail_on: Vec::new(),
            ops: Vec::new(),
        }
    }
}

impl FakeWorkspace {
    pub fn failing_on(op: &str) -> Self {
        Self {
            fail_on: vec![op.to_string()],
            ..Self::default()
        }
    }

    pub fn did(&self, op: &str) -> bool {
        self.ops.iter().any(|o| o == op)
    }

    /// Whether any operation pushed anything
    pub fn pushed(&self) -> bool {
        self.ops.iter().any(|o| o.starts_with("push "))
    }

    fn record(&mut self, op: impl Into<String>) -> Result<(), GitError> {
        let op = op.into();
        self.ops.push(op.clone());
        if self.fail_on.contains(&op) {
            return Err(GitError::Failed {
                command: op,
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Workspace for FakeWorkspace {
    async fn is_repository(&mut self) -> Result<bool, GitError> {
        self.record("is_repository")?;
        Ok(self.is_repo)
    }

    async fn status(&mut self) -> Result<TreeStatus, GitError> {
        self.record("status")?;
        Ok(TreeStatus {
            entries: self.dirty.clone(),
        })
    }

    async fn remote_url(&mut self) -> Result<String, GitError> {
        self.record("remote_url")?;
        Ok(self.remote_url.clone())
    }

    async fn set_identity(&mut self, author: &Identity) -> Result<(), GitError> {
        self.record(format!("set_identity {}", author.email))
    }

    async fn stage_all(&mut self) -> Result<(), GitError> {
        self.record("stage_all")
    }

    async fn commit(
        &mut self,
        message: &str,
        _extra_args: &[String],
        _committer: &Identity,
    ) -> Result<String, GitError> {
        self.record(format!("commit {message}"))?;
        self.dirty.clear();
        self.ahead += 1;
        self.head = "1111111111111111111111111111111111111111".to_string();
        Ok(self.head.clone())
    }

    async fn fetch(&mut self) -> Result<(), GitError> {
        self.record("fetch")
    }

    async fn branches(&mut self) -> Result<Vec<String>, GitError> {
        self.record("branches")?;
        Ok(self.branches.clone())
    }

    async fn ahead_count(&mut self, target: &str) -> Result<u32, GitError> {
        self.record(format!("ahead_count {target}"))?;
        Ok(self.ahead)
    }

    async fn checkout_new_branch(&mut self, name: &str) -> Result<(), GitError> {
        self.record(format!("checkout_new_branch {name}"))
    }

    async fn checkout(&mut self, name: &str) -> Result<(), GitError> {
        self.record(format!("checkout {name}"))
    }

    async fn delete_branch(&mut self, name: &str) -> Result<(), GitError> {
        self.record(format!("delete_branch {name}"))
    }

    async fn reset_hard(&mut self, target: &str) -> Result<(), GitError> {
        self.record(format!("reset_hard {target}"))
    }

    async fn push(&mut self, branch: &str, force: bool) -> Result<(), GitError> {
        if force {
            self.record(format!("push --force {branch}"))
        } else {
            self.record(format!("push {branch}"))
        }
    }

    async fn head(&mut self) -> Result<String, GitError> {
        self.record("head")?;
        Ok(self.head.clone())
    }
}

// =================================
// ===== Real git repositories
// =================================

/// Run git in `dir`, panicking with its stderr on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A bare `origin` with one commit on `main`, and a clone of it
pub struct GitFixture {
    pub root: TempDir,
    pub origin: PathBuf,
    pub work: PathBuf,
}

impl GitFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let origin = root.path().join("origin.git");
        let work = root.path().join("work");
        fs::create_dir_all(&origin).expect("Failed to create origin dir");
        fs::create_dir_all(&work).expect("Failed to create work dir");

        git(&origin, &["init", "--bare", "--initial-branch=main"]);
        git(&work, &["init", "--initial-branch=main"]);
        fs::write(work.join("README.md"), "# widgets\n").expect("Failed to write README");
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "Initial commit"]);
        git(
            &work,
            &["remote", "add", "origin", origin.to_str().expect("utf-8 path")],
        );
        git(&work, &["push", "-u", "origin", "main"]);

        Self { root, origin, work }
    }

    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.work.join(file), content).expect("Failed to write file");
    }

    /// Commit everything in the clone
    pub fn commit_all(&self, message: &str) -> String {
        git(&self.work, &["add", "-A"]);
        git(&self.work, &["commit", "-m", message]);
        git(&self.work, &["rev-parse", "HEAD"])
    }

    pub fn origin_rev(&self, branch: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{branch}")])
            .current_dir(&self.origin)
            .output()
            .expect("Failed to execute git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
