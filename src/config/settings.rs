//! Resolved configuration for one run
//!
//! Precedence is flag or environment variable, then the YAML file, then the
//! built-in default. Empty strings count as unset because CI runners export
//! every declared input, including the ones left blank.

use super::loader::{CommitArgs, FileConfig};
use super::repository::RepoSlug;
use super::{ConfigError, Inputs};
use crate::checks::PollSettings;
use crate::constants::{config as config_defaults, git as git_defaults, github, poll};
use crate::git::{CommitRequest, Identity};
use crate::telemetry::LogFormat;
use crate::utils::validators::{
    self, ValidationError, parse_bool, parse_seconds, validate_branch_name, validate_email,
};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

pub struct PushConfig {
    pub token: String,
    /// Protected branch to land on
    pub branch: String,
    /// `None` means "derive from the origin remote"
    pub repository: Option<RepoSlug>,
    pub api_url: String,
    pub repo_path: PathBuf,
    pub poll: PollSettings,
    /// `Some` when committing on behalf of the caller
    pub commit: Option<CommitRequest>,
    pub run_id: String,
    pub log_format: LogFormat,
    pub debug: bool,
}

impl fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushConfig")
            .field("token", &"<redacted>")
            .field("branch", &self.branch)
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("repo_path", &self.repo_path)
            .field("poll", &self.poll)
            .field("commit", &self.commit)
            .field("run_id", &self.run_id)
            .field("log_format", &self.log_format)
            .field("debug", &self.debug)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn seconds(
    argument: &str,
    input: Option<String>,
    file: Option<u64>,
    default: u64,
) -> Result<Duration, ValidationError> {
    match non_empty(input) {
        Some(value) => parse_seconds(argument, &value),
        None => Ok(Duration::from_secs(file.unwrap_or(default))),
    }
}

fn flag(argument: &str, input: Option<String>, file: Option<bool>) -> Result<bool, ValidationError> {
    match non_empty(input) {
        Some(value) => parse_bool(argument, &value),
        None => Ok(file.unwrap_or(false)),
    }
}

/// Default author for commits made on the caller's behalf
fn default_author(actor: Option<String>) -> Identity {
    match non_empty(actor) {
        Some(actor) => Identity::new(
            actor.clone(),
            format!("{actor}@{}", github::NOREPLY_DOMAIN),
        ),
        None => Identity::new(github::BOT_NAME, github::BOT_EMAIL),
    }
}

fn local_run_id() -> String {
    Uuid::new_v4().simple().to_string()[..git_defaults::LOCAL_RUN_ID_LENGTH].to_string()
}

impl PushConfig {
    /// Read the config file named by `inputs` (if any) and resolve
    pub fn load(inputs: Inputs) -> Result<Self, ConfigError> {
        let file = FileConfig::load_optional(inputs.config.as_deref())?;
        Self::resolve(inputs, file)
    }

    /// Merge inputs over file values over defaults, then validate
    pub fn resolve(inputs: Inputs, file: FileConfig) -> Result<Self, ConfigError> {
        let token = non_empty(inputs.token)
            .or_else(|| non_empty(inputs.github_token))
            .ok_or(ConfigError::MissingToken)?;

        let branch = non_empty(inputs.branch)
            .or(file.branch)
            .unwrap_or_else(|| git_defaults::FALLBACK_BRANCH.to_string());
        let branch = branch.trim().to_string();
        validate_branch_name("branch", &branch)?;

        let timeout = seconds(
            "timeout",
            inputs.timeout,
            file.timeout,
            poll::DEFAULT_TIMEOUT_SECS,
        )?;
        if timeout.is_zero() {
            return Err(ValidationError::InvalidValue {
                argument: "timeout".to_string(),
                value: "0".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        let interval = seconds(
            "interval",
            inputs.interval,
            file.interval,
            poll::DEFAULT_INTERVAL_SECS,
        )?;
        let initial_delay = seconds("sleep", inputs.sleep, file.sleep, poll::DEFAULT_SLEEP_SECS)?;

        let repository = match non_empty(inputs.repository).or(file.repository) {
            Some(slug) => Some(slug.parse::<RepoSlug>().map_err(|reason| {
                ValidationError::InvalidValue {
                    argument: "repository".to_string(),
                    value: slug.clone(),
                    reason,
                }
            })?),
            None => None,
        };

        let commit = if flag("commit", inputs.commit, file.commit)? {
            let message = non_empty(inputs.commit_message).or(file.commit_message);
            validators::validate_commit_message(message.as_deref())?;

            let extra_args = match non_empty(inputs.commit_args)
                .map(CommitArgs::Line)
                .or(file.commit_args)
            {
                Some(args) => args.into_args()?,
                None => Vec::new(),
            };

            let fallback = default_author(inputs.actor);
            let author = Identity::new(
                non_empty(inputs.author_name)
                    .or(file.author_name)
                    .unwrap_or(fallback.name),
                non_empty(inputs.author_email)
                    .or(file.author_email)
                    .unwrap_or(fallback.email),
            );
            let committer = Identity::new(
                non_empty(inputs.committer_name)
                    .or(file.committer_name)
                    .unwrap_or_else(|| author.name.clone()),
                non_empty(inputs.committer_email)
                    .or(file.committer_email)
                    .unwrap_or_else(|| author.email.clone()),
            );
            validate_email("author email", &author.email)?;
            validate_email("committer email", &committer.email)?;

            Some(CommitRequest {
                message: message.unwrap_or_default(),
                extra_args,
                author,
                committer,
            })
        } else {
            None
        };

        let log_format = match non_empty(inputs.log_format) {
            Some(value) => value.parse().map_err(|_| ValidationError::InvalidValue {
                argument: "log format".to_string(),
                value: value.clone(),
                reason: "expected text or json".to_string(),
            })?,
            None => file.log_format.unwrap_or_default(),
        };

        let runner_debug = non_empty(inputs.runner_debug).is_some_and(|v| v.trim() == "1");
        let debug = flag("debug", inputs.debug, file.debug)? || runner_debug;

        Ok(Self {
            token,
            branch,
            repository,
            api_url: non_empty(inputs.api_url)
                .or(file.api_url)
                .unwrap_or_else(|| github::API_BASE.to_string()),
            repo_path: PathBuf::from(
                non_empty(inputs.path)
                    .or(file.path)
                    .unwrap_or_else(|| config_defaults::DEFAULT_REPO_PATH.to_string()),
            ),
            poll: PollSettings {
                timeout,
                interval,
                initial_delay,
            },
            commit,
            run_id: non_empty(inputs.run_id).unwrap_or_else(local_run_id),
            log_format,
            debug,
        })
    }
}
