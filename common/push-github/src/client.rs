//! GitHub client implementation

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};

/// Public GitHub API base URL
pub const API_BASE: &str = "https://api.github.com";

/// REST API version pinned on every request
pub const API_VERSION: &str = "2022-11-28";

/// Default User-Agent header for API requests
pub const DEFAULT_USER_AGENT: &str = concat!("protected-push/", env!("CARGO_PKG_VERSION"));

/// GitHub API client for making authenticated requests
///
/// The client itself carries no credential: every operation receives a
/// [`crate::BranchRef`] which owns the token used for that call.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_base: String,
}

impl GitHubClient {
    /// Create a new GitHub client against the given API base URL
    ///
    /// Pass [`API_BASE`] for github.com, or the `GITHUB_API_URL` of a
    /// GitHub Enterprise Server instance.
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }

    /// The API base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub(crate) fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(token)
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

/// Read the `message` field GitHub puts in error bodies, falling back to the
/// status reason when the body is empty or not JSON.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    crate::util::api_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string())
}
