//! GitHub API error types.
//!
//! Each operation maps HTTP status codes onto the variants its callers need
//! to branch on. Only [`GitHubError::RefNotReady`] is retryable: it means the
//! ref was pushed but GitHub has not indexed it yet.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// The branch does not exist, is not protected, or the token cannot read it.
    #[error("branch '{branch}' is missing, unprotected, or unreadable with this token: {message}")]
    NotFoundOrUnauthorized { branch: String, message: String },

    /// The credential was rejected outright (HTTP 401).
    #[error("GitHub rejected the access token: {message}")]
    Auth { message: String },

    /// The ref cannot be resolved yet (HTTP 422), usually right after a push.
    #[error("ref '{reference}' is not yet resolvable: {message}")]
    RefNotReady { reference: String, message: String },

    /// Any other non-success response.
    #[error("GitHub API request failed ({status}): {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response, or the body could not be decoded.
    #[error("GitHub API request failed")]
    Transport(#[from] reqwest::Error),
}

impl GitHubError {
    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, GitHubError::RefNotReady { .. })
    }

    /// Classify a failed required-status-checks lookup
    pub(crate) fn from_protection_status(status: StatusCode, branch: &str, message: String) -> Self {
        match status.as_u16() {
            401 | 403 | 404 => GitHubError::NotFoundOrUnauthorized {
                branch: branch.to_string(),
                message,
            },
            code => GitHubError::Http {
                status: code,
                message,
            },
        }
    }

    /// Classify a failed check-runs listing
    pub(crate) fn from_check_runs_status(
        status: StatusCode,
        reference: &str,
        message: String,
    ) -> Self {
        match status.as_u16() {
            401 => GitHubError::Auth { message },
            422 => GitHubError::RefNotReady {
                reference: reference.to_string(),
                message,
            },
            code => GitHubError::Http {
                status: code,
                message,
            },
        }
    }

    /// Classify any other failed request
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => GitHubError::Auth { message },
            code => GitHubError::Http {
                status: code,
                message,
            },
        }
    }
}
