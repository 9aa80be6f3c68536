//! forge::gitlab
//!
//! GitLab forge implementation using the v4 REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitLab. The repository
//! path is URL-encoded into a project identifier for every endpoint.
//! GitLab supports `remove_source_branch` and `squash` as fields of the
//! creation payload, so the merge call carries no method and
//! `delete_source_branch` stays the default no-op.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{CreatedRequest, Forge, ForgeError, MergeMethod, MergeRequestSpec};
use crate::auth::TokenCheck;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// GitLab forge implementation.
pub struct GitLabForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// URL-encoded project identifier
    project: String,
    /// Base URL of the GitLab instance
    base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitLabForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabForge")
            .field("project", &self.project)
            .field("base", &self.base)
            .finish()
    }
}

impl GitLabForge {
    /// Create a forge talking to a GitLab instance at `host`.
    pub fn new(token: impl Into<String>, repo_path: &str, host: &str) -> Self {
        Self::with_base(token, repo_path, format!("https://{host}"))
    }

    /// Create a forge with an explicit base URL.
    pub fn with_base(token: impl Into<String>, repo_path: &str, base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            project: urlencoding::encode(repo_path).into_owned(),
            base: base.into(),
        }
    }

    /// Build URL for a project endpoint.
    fn project_url(&self, path: &str) -> String {
        format!("{}/api/v4/projects/{}/{}", self.base, self.project, path)
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
}

/// Map an error response to a `ForgeError`.
async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
    let message = match response.json::<GitLabErrorResponse>().await {
        Ok(err) => err.message(),
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

/// GitLab reports errors as `message` or `error`, and `message` may be
/// a string, a list, or an object.
#[derive(Debug, Deserialize)]
struct GitLabErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl GitLabErrorResponse {
    fn message(self) -> String {
        match (self.message, self.error) {
            (Some(serde_json::Value::String(s)), _) => s,
            (Some(other), _) => other.to_string(),
            (None, Some(error)) => error,
            (None, None) => "Unknown error".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateMergeRequestBody<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    description: &'a str,
    remove_source_branch: bool,
    squash: bool,
}

#[derive(Debug, Deserialize)]
struct MergeRequestResponse {
    iid: u64,
    web_url: String,
}

#[async_trait]
impl Forge for GitLabForge {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn create_request(&self, spec: &MergeRequestSpec) -> Result<CreatedRequest, ForgeError> {
        let body = CreateMergeRequestBody {
            source_branch: &spec.source_branch,
            target_branch: &spec.target_branch,
            title: &spec.title,
            description: &spec.description,
            remove_source_branch: true,
            squash: spec.squash,
        };
        let response = self
            .client
            .post(self.project_url("merge_requests"))
            .header(TOKEN_HEADER, &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let mr: MergeRequestResponse = self.handle_response(response).await?;
        Ok(CreatedRequest {
            number: mr.iid,
            url: mr.web_url,
            source_branch: spec.source_branch.clone(),
        })
    }

    // Squash was fixed at creation time, so the method is not sent.
    async fn merge_request(
        &self,
        request: &CreatedRequest,
        _method: MergeMethod,
    ) -> Result<(), ForgeError> {
        let response = self
            .client
            .put(self.project_url(&format!("merge_requests/{}/merge", request.number)))
            .header(TOKEN_HEADER, &self.token)
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

/// Token validity check against the GitLab `/user` endpoint.
pub struct GitLabTokenCheck {
    client: Client,
    base: String,
}

impl GitLabTokenCheck {
    pub fn new(host: &str) -> Self {
        Self::with_base(format!("https://{host}"))
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into(),
        }
    }
}

#[async_trait]
impl TokenCheck for GitLabTokenCheck {
    async fn check(&self, token: &str) -> Result<(), ForgeError> {
        let response = self
            .client
            .get(format!("{}/api/v4/user", self.base))
            .header(TOKEN_HEADER, token)
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
