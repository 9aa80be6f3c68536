//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully.
//!
//! The dispatch flow (create, then optionally merge and clean up the
//! source branch) lives here as [`create_and_maybe_merge`] so both
//! forge backends share the same failure semantics: a failed creation
//! is fatal, a failed merge after creation is reported but leaves the
//! request standing.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub and GitLab.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Merge method for merging a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits and merge
    Squash,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeMethod::Merge => write!(f, "merge"),
            MergeMethod::Squash => write!(f, "squash"),
        }
    }
}

/// Everything needed to open a merge request.
#[derive(Debug, Clone)]
pub struct MergeRequestSpec {
    /// Branch with the changes
    pub source_branch: String,
    /// Branch to merge into
    pub target_branch: String,
    /// Request title
    pub title: String,
    /// Request description
    pub description: String,
    /// Merge by squash instead of a merge commit
    pub squash: bool,
    /// Merge the request immediately after creating it
    pub auto_merge: bool,
}

impl MergeRequestSpec {
    /// Merge method implied by the squash flag.
    pub fn merge_method(&self) -> MergeMethod {
        if self.squash {
            MergeMethod::Squash
        } else {
            MergeMethod::Merge
        }
    }
}

/// A merge request that exists on the forge.
#[derive(Debug, Clone)]
pub struct CreatedRequest {
    /// Request number (PR number on GitHub, IID on GitLab)
    pub number: u64,
    /// Web URL for viewing
    pub url: String,
    /// Branch the request merges from
    pub source_branch: String,
}

/// What happened to the request after creation.
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// Merged on the forge
    Merged,
    /// Left open; merging was not requested
    Skipped,
    /// Merge was requested but the forge refused
    Failed(ForgeError),
}

/// Result of a full dispatch: the created request plus what happened
/// to it afterwards.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The request as created on the forge
    pub request: CreatedRequest,
    /// Merge result
    pub merge: MergeOutcome,
    /// Error from source-branch deletion, when the merge itself
    /// succeeded but cleanup did not
    pub branch_cleanup_error: Option<ForgeError>,
}

impl DispatchOutcome {
    /// Whether the request was merged on the forge.
    pub fn merged(&self) -> bool {
        matches!(self.merge, MergeOutcome::Merged)
    }
}

/// The Forge trait for interacting with remote hosting services.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github", "gitlab").
    fn name(&self) -> &'static str;

    /// Create a new merge request.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `ApiError` with status 422 if validation fails (e.g., a
    ///   request for this branch already exists)
    async fn create_request(&self, spec: &MergeRequestSpec) -> Result<CreatedRequest, ForgeError>;

    /// Merge an existing request.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request doesn't exist
    /// - `ApiError` if merging fails (e.g., conflicts, required checks)
    async fn merge_request(
        &self,
        request: &CreatedRequest,
        method: MergeMethod,
    ) -> Result<(), ForgeError>;

    /// Delete the request's source branch on the remote after a merge.
    ///
    /// Forges that arrange deletion at creation time keep this default
    /// no-op.
    async fn delete_source_branch(&self, _request: &CreatedRequest) -> Result<(), ForgeError> {
        Ok(())
    }
}

/// Create a request and, when asked, merge it and drop its source
/// branch.
///
/// Creation failures propagate; merge failures after a successful
/// creation are folded into the outcome instead, since the request
/// exists and the caller should hear about it.
///
/// # Errors
///
/// Only errors from `create_request`.
pub async fn create_and_maybe_merge(
    forge: &dyn Forge,
    spec: MergeRequestSpec,
) -> Result<DispatchOutcome, ForgeError> {
    let method = spec.merge_method();
    let auto_merge = spec.auto_merge;
    let request = forge.create_request(&spec).await?;

    if !auto_merge {
        return Ok(DispatchOutcome {
            request,
            merge: MergeOutcome::Skipped,
            branch_cleanup_error: None,
        });
    }

    if let Err(e) = forge.merge_request(&request, method).await {
        return Ok(DispatchOutcome {
            request,
            merge: MergeOutcome::Failed(e),
            branch_cleanup_error: None,
        });
    }

    let branch_cleanup_error = forge.delete_source_branch(&request).await.err();
    Ok(DispatchOutcome {
        request,
        merge: MergeOutcome::Merged,
        branch_cleanup_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_method_display() {
        assert_eq!(format!("{}", MergeMethod::Merge), "merge");
        assert_eq!(format!("{}", MergeMethod::Squash), "squash");
    }

    #[test]
    fn merge_method_default_is_merge() {
        assert_eq!(MergeMethod::default(), MergeMethod::Merge);
    }

    #[test]
    fn spec_squash_flag_selects_method() {
        let mut spec = MergeRequestSpec {
            source_branch: "feature".to_string(),
            target_branch: "main".to_string(),
            title: "Add feature".to_string(),
            description: String::new(),
            squash: false,
            auto_merge: false,
        };
        assert_eq!(spec.merge_method(), MergeMethod::Merge);
        spec.squash = true;
        assert_eq!(spec.merge_method(), MergeMethod::Squash);
    }

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("request #123".into())),
            "not found: request #123"
        );
        assert_eq!(format!("{}", ForgeError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }
}
