//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. Requests merge
//! into GitHub as pull requests; the source branch is removed with an
//! explicit ref deletion after a merge, since the API has no
//! delete-on-merge flag at creation time.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! `ForgeError::RateLimited` when limits are hit and does not retry
//! (caller's responsibility).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{CreatedRequest, Forge, ForgeError, MergeMethod, MergeRequestSpec};
use crate::auth::TokenCheck;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "easy-merge";

/// Pause between creating a pull request and merging it. GitHub's
/// merge endpoint can 404 when called immediately after creation.
const MERGE_DELAY: Duration = Duration::from_secs(1);

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// Repository path (`owner/repo`)
    repo_path: String,
    /// API base URL
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("repo_path", &self.repo_path)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a forge talking to the API subdomain of `host`.
    pub fn new(token: impl Into<String>, repo_path: impl Into<String>, host: &str) -> Self {
        Self::with_api_base(token, repo_path, format!("https://api.{host}"))
    }

    /// Create a forge with an explicit API base URL.
    pub fn with_api_base(
        token: impl Into<String>,
        repo_path: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            repo_path: repo_path.into(),
            api_base: api_base.into(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?,
        );
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

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.repo_path, path)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(error_from_response(response, status).await)
        }
    }

    /// Handle API response when the body doesn't matter.
    async fn handle_empty_response(&self, response: Response) -> Result<(), ForgeError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(response, status).await)
        }
    }
}

/// Map an error response to a `ForgeError`.
async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
    let message = match response.json::<GitHubErrorResponse>().await {
        Ok(err) => err.message,
        Err(_) => "Unknown error".to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
        StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => ForgeError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
        _ => ForgeError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct CreatePullBody<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
    maintainer_can_modify: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
}

#[derive(Debug, Serialize)]
struct MergePullBody {
    merge_method: String,
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn create_request(&self, spec: &MergeRequestSpec) -> Result<CreatedRequest, ForgeError> {
        let body = CreatePullBody {
            title: &spec.title,
            body: &spec.description,
            head: &spec.source_branch,
            base: &spec.target_branch,
            maintainer_can_modify: true,
        };
        let response = self
            .client
            .post(self.repo_url("pulls"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let pull: PullResponse = self.handle_response(response).await?;
        Ok(CreatedRequest {
            number: pull.number,
            url: pull.html_url,
            source_branch: spec.source_branch.clone(),
        })
    }

    async fn merge_request(
        &self,
        request: &CreatedRequest,
        method: MergeMethod,
    ) -> Result<(), ForgeError> {
        tokio::time::sleep(MERGE_DELAY).await;

        let body = MergePullBody {
            merge_method: method.to_string(),
        };
        let response = self
            .client
            .put(self.repo_url(&format!("pulls/{}/merge", request.number)))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    async fn delete_source_branch(&self, request: &CreatedRequest) -> Result<(), ForgeError> {
        let response = self
            .client
            .delete(self.repo_url(&format!("git/refs/heads/{}", request.source_branch)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        self.handle_empty_response(response).await
    }
}

/// Token validity check against the GitHub `/user` endpoint.
pub struct GitHubTokenCheck {
    client: Client,
    api_base: String,
}

impl GitHubTokenCheck {
    pub fn new(host: &str) -> Self {
        Self::with_api_base(format!("https://api.{host}"))
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl TokenCheck for GitHubTokenCheck {
    async fn check(&self, token: &str) -> Result<(), ForgeError> {
        let auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?;
        let response = self
            .client
            .get(format!("{}/user", self.api_base))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(response, status).await)
        }
    }
}
