//! Central constants for the protected-push application

/// Default values for Git operations
pub mod git {
    /// Default target branch when none is configured
    pub const FALLBACK_BRANCH: &str = "main";

    /// Remote that branches are fetched from and pushed to
    pub const REMOTE: &str = "origin";

    /// Prefix of the disposable branch pushed for status checks
    pub const TEMP_BRANCH_PREFIX: &str = "push-action";

    /// Length of the random id used when no CI run id is available
    pub const LOCAL_RUN_ID_LENGTH: usize = 8;
}

/// Default values for GitHub operations
pub mod github {
    pub use push_github::API_BASE;

    /// Identity used for commits when no triggering actor is known
    pub const BOT_NAME: &str = "github-actions[bot]";
    pub const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

    /// Domain of GitHub's per-user noreply addresses
    pub const NOREPLY_DOMAIN: &str = "users.noreply.github.com";
}

/// Default values for check polling
pub mod poll {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
    pub const DEFAULT_INTERVAL_SECS: u64 = 30;
    pub const DEFAULT_SLEEP_SECS: u64 = 0;
}

/// Default values for configuration
pub mod config {
    /// Default repository working directory
    pub const DEFAULT_REPO_PATH: &str = ".";
}
