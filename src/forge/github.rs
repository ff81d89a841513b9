//! forge::github
//!
//! GitHub REST implementation of [`GitHubApi`].
//!
//! # Status mapping
//!
//! | Status | Error kind | Retried |
//! |---|---|---|
//! | 2xx | - | - |
//! | 401 | `AuthenticationFailed` | no |
//! | 403, `X-RateLimit-Remaining: 0` | `RateLimited` | no |
//! | 403 otherwise | `InsufficientPermissions` | no |
//! | 404 | `RepositoryNotFound` | no |
//! | 5xx | `General` | yes |
//! | other | `General` | no |
//!
//! Transport failures (DNS, refused connection, timeouts) are `General` and
//! retried. A body that fails to decode on a 2xx response is `General` and
//! not retried.
//!
//! # Headers
//!
//! Rate-limit and scope information arrive in response headers. They are
//! read before the body is consumed.
//!
//! # Example
//!
//! ```ignore
//! use delete_branch_on_merge::forge::github::GitHubClient;
//! use delete_branch_on_merge::forge::GitHubApi;
//!
//! let client = GitHubClient::new("ghp_xxx");
//! let state = client.get_repository(&repo, &cancel).await?;
//! println!("{} -> {}", state.full_name(), state.delete_branch_on_merge);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::retry::{with_retry, Failure, RetryPolicy};
use super::traits::GitHubApi;
use crate::core::config::schema::DEFAULT_API_URL;
use crate::core::errors::AppError;
use crate::core::types::{RepositoryRef, RepositorySettingsPatch, RepositoryState, TokenMetadata};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("delete-branch-on-merge/", env!("CARGO_PKG_VERSION"));

/// Remaining request quota.
const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// When the quota resets.
const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// Scopes granted to a classic token.
const OAUTH_SCOPES: &str = "X-OAuth-Scopes";

/// GitHub REST client.
pub struct GitHubClient {
    /// HTTP client for making requests
    client: Client,
    /// Bearer credential
    token: String,
    /// API base URL without trailing slash
    api_base: String,
    /// Retry schedule for transient failures
    retry: RetryPolicy,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client for `api.github.com` with the default retry policy.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at another API root (GitHub Enterprise, test server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the underlying HTTP client (per-request timeouts, proxies).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// API base URL in use.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|e| {
            AppError::general("Failed to build request: token is not a valid header value")
                .with_source(e)
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Send a request, retrying transient failures, and return the 2xx response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        cancel: &CancellationToken,
    ) -> Result<Response, AppError> {
        let url = format!("{}{}", self.api_base, path);

        with_retry(&self.retry, cancel, |attempt| {
            let method = method.clone();
            let url = &url;
            async move {
                debug!(%method, path, attempt, "sending GitHub API request");

                let headers = self.headers().map_err(Failure::Fatal)?;
                let mut request = self.client.request(method, url.as_str()).headers(headers);
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = tokio::select! {
                    _ = cancel.cancelled() => return Err(Failure::Fatal(AppError::cancelled())),
                    result = request.send() => result.map_err(|e| {
                        Failure::Transient(
                            AppError::general(format!("Network error contacting GitHub: {}", e))
                                .with_source(e),
                        )
                    })?,
                };

                let status = response.status();
                if status.is_success() {
                    Ok(response)
                } else {
                    let failure = classify_error_response(path, response).await;
                    debug!(%status, path, attempt, ?failure, "GitHub API request failed");
                    Err(failure)
                }
            }
        })
        .await
    }

    /// Decode a 2xx body. Failures here are never retried.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<T, AppError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(AppError::cancelled()),
            result = response.json::<T>() => result.map_err(|e| {
                AppError::general(format!("Failed to parse GitHub response: {}", e)).with_source(e)
            }),
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_repository(
        &self,
        repo: &RepositoryRef,
        cancel: &CancellationToken,
    ) -> Result<RepositoryState, AppError> {
        let response = self
            .execute(Method::GET, &repo_path(repo), None, cancel)
            .await?;
        let repository: GitHubRepository = Self::decode(response, cancel).await?;
        Ok(repository.into())
    }

    async fn update_repository(
        &self,
        repo: &RepositoryRef,
        patch: RepositorySettingsPatch,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        let body = serde_json::to_value(patch)
            .map_err(|e| AppError::general("Failed to encode settings update").with_source(e))?;
        self.execute(Method::PATCH, &repo_path(repo), Some(&body), cancel)
            .await?;
        Ok(())
    }

    async fn validate_token(&self, cancel: &CancellationToken) -> Result<TokenMetadata, AppError> {
        let response = self.execute(Method::GET, "/user", None, cancel).await?;

        let scopes = response
            .headers()
            .get(OAUTH_SCOPES)
            .and_then(|v| v.to_str().ok())
            .map(parse_scopes)
            .unwrap_or_default();

        let user: GitHubUser = Self::decode(response, cancel).await?;
        Ok(TokenMetadata {
            username: user.login,
            scopes,
        })
    }
}

/// Map a non-2xx response to a retry decision and a taxonomy error.
async fn classify_error_response(path: &str, response: Response) -> Failure {
    let status = response.status();

    // Headers first: the body read consumes the response.
    let headers = response.headers();
    let remaining = header_str(headers, RATE_LIMIT_REMAINING).map(str::to_string);
    let reset = header_str(headers, RATE_LIMIT_RESET).map(str::to_string);

    let message = match response.json::<GitHubErrorResponse>().await {
        Ok(err) => err.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED => Failure::Fatal(AppError::authentication_failed(format!(
            "GitHub rejected the token ({})",
            message
        ))),
        StatusCode::FORBIDDEN => {
            if remaining.as_deref().map(str::trim) == Some("0") {
                Failure::Fatal(AppError::rate_limited(parse_rate_limit_reset(
                    reset.as_deref(),
                    Utc::now(),
                )))
            } else {
                let repository = repo_from_path(path).map(|(o, n)| format!("{}/{}", o, n));
                Failure::Fatal(AppError::insufficient_permissions(
                    repository.as_deref(),
                    message,
                ))
            }
        }
        StatusCode::NOT_FOUND => Failure::Fatal(match repo_from_path(path) {
            Some((owner, name)) => AppError::not_found(owner, name),
            None => AppError::new(
                crate::core::errors::ErrorKind::RepositoryNotFound,
                format!("GitHub resource '{}' not found", path),
            ),
        }),
        _ if status.is_server_error() => Failure::Transient(AppError::general(format!(
            "GitHub server error (HTTP {}): {}",
            status.as_u16(),
            message
        ))),
        _ => Failure::Fatal(AppError::general(format!(
            "Unexpected GitHub API response (HTTP {}): {}",
            status.as_u16(),
            message
        ))),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// `/repos/{owner}/{name}`.
fn repo_path(repo: &RepositoryRef) -> String {
    format!("/repos/{}/{}", repo.owner(), repo.name())
}

/// Recover owner and name from a `/repos/{owner}/{name}` path.
pub fn repo_from_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix("/repos/")?;
    let mut parts = rest.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Some((owner, name)),
        _ => None,
    }
}

/// Parse the rate-limit reset header.
///
/// Unix seconds first, then RFC 3339, else one hour from `now`.
pub fn parse_rate_limit_reset(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let fallback = now + chrono::Duration::hours(1);
    let Some(value) = value.map(str::trim) else {
        return fallback;
    };

    if let Ok(secs) = value.parse::<i64>() {
        if let Some(at) = DateTime::from_timestamp(secs, 0) {
            return at;
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or(fallback)
}

/// Split a comma-separated scopes header, trimming each entry.
///
/// Header order is kept; repeated entries appear once, at their first position.
pub fn parse_scopes(value: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for scope in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !scopes.iter().any(|seen| seen == scope) {
            scopes.push(scope.to_string());
        }
    }
    scopes
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Repository as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    owner: GitHubOwner,
    name: String,
    default_branch: String,
    #[serde(default)]
    delete_branch_on_merge: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

impl From<GitHubRepository> for RepositoryState {
    fn from(repo: GitHubRepository) -> Self {
        RepositoryState {
            owner: repo.owner.login,
            name: repo.name,
            default_branch: repo.default_branch,
            delete_branch_on_merge: repo.delete_branch_on_merge,
        }
    }
}

/// User as returned by `GET /user`.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

/// Error body returned by GitHub.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}
