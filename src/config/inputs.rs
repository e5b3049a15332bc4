//! Raw inputs from the command line and environment
//!
//! Every flag can also be supplied through an environment variable. The
//! `INPUT_*` names are the ones CI action runners export for action inputs,
//! and the `GITHUB_*` names are the runner's built-in variables. Values stay
//! as strings here; [`super::PushConfig::resolve`] validates and parses them,
//! treating empty strings as unset.

use clap::Parser;

#[derive(Parser, Clone, Default)]
#[command(name = "protected-push")]
#[command(about = "Land commits on a branch protected by required status checks")]
#[command(version)]
pub struct Inputs {
    /// GitHub token with write access to the repository
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Fallback token provided by the CI runner
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Protected branch to land commits on (default: main)
    #[arg(short, long, env = "INPUT_BRANCH")]
    pub branch: Option<String>,

    /// Seconds to wait for required checks (default: 300)
    #[arg(long, env = "INPUT_TIMEOUT")]
    pub timeout: Option<String>,

    /// Seconds between check samples (default: 30)
    #[arg(long, env = "INPUT_INTERVAL")]
    pub interval: Option<String>,

    /// Seconds to wait after pushing before the first check sample (default: 0)
    #[arg(long, env = "INPUT_SLEEP")]
    pub sleep: Option<String>,

    /// Commit uncommitted changes before pushing
    #[arg(long, env = "INPUT_COMMIT", num_args = 0..=1, default_missing_value = "true")]
    pub commit: Option<String>,

    /// Message for the commit made with --commit
    #[arg(long, env = "INPUT_COMMIT_MESSAGE")]
    pub commit_message: Option<String>,

    /// Extra arguments passed to `git commit`, split like a shell command line
    #[arg(long, env = "INPUT_COMMIT_ARGS", allow_hyphen_values = true)]
    pub commit_args: Option<String>,

    /// Author name (default: the triggering actor)
    #[arg(long, env = "INPUT_AUTHOR_NAME")]
    pub author_name: Option<String>,

    /// Author e-mail (default: the triggering actor's noreply address)
    #[arg(long, env = "INPUT_AUTHOR_EMAIL")]
    pub author_email: Option<String>,

    /// Committer name (default: the author name)
    #[arg(long, env = "INPUT_COMMITTER_NAME")]
    pub committer_name: Option<String>,

    /// Committer e-mail (default: the author e-mail)
    #[arg(long, env = "INPUT_COMMITTER_EMAIL")]
    pub committer_email: Option<String>,

    /// User that triggered the workflow
    #[arg(long, env = "GITHUB_ACTOR", hide = true)]
    pub actor: Option<String>,

    /// CI run id used to name the temporary branch
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// Repository as owner/name (default: parsed from the origin remote)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Path of the local repository (default: current directory)
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// YAML file with default values for any of these inputs
    #[arg(short, long, env = "INPUT_CONFIG")]
    pub config: Option<String>,

    /// Log output format: text or json
    #[arg(long, env = "INPUT_LOG_FORMAT")]
    pub log_format: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "INPUT_DEBUG", num_args = 0..=1, default_missing_value = "true")]
    pub debug: Option<String>,

    /// Set to 1 by the CI runner when step debug logging is enabled
    #[arg(long, env = "RUNNER_DEBUG", hide = true)]
    pub runner_debug: Option<String>,
}
