//! forge::factory
//!
//! Constructs the right forge backend for a detected platform.

use super::github::{GitHubForge, GitHubTokenCheck};
use super::gitlab::{GitLabForge, GitLabTokenCheck};
use super::traits::Forge;
use crate::auth::TokenCheck;
use crate::host::RemoteDescriptor;

/// Platform a remote host was identified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    GitHub,
    GitLab,
}

impl ForgeProvider {
    /// Short machine name.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
            ForgeProvider::GitLab => "gitlab",
        }
    }

    /// Display name used as the credential key and in prompts.
    pub fn token_name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "GitHub token",
            ForgeProvider::GitLab => "GitLab token",
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Build the forge backend for a provider.
pub fn create_forge(
    provider: ForgeProvider,
    remote: &RemoteDescriptor,
    token: &str,
) -> Box<dyn Forge> {
    match provider {
        ForgeProvider::GitHub => Box::new(GitHubForge::new(token, &remote.repo_path, &remote.host)),
        ForgeProvider::GitLab => Box::new(GitLabForge::new(token, &remote.repo_path, &remote.host)),
    }
}

/// Build the token check for a provider.
pub fn create_token_check(provider: ForgeProvider, host: &str) -> Box<dyn TokenCheck> {
    match provider {
        ForgeProvider::GitHub => Box::new(GitHubTokenCheck::new(host)),
        ForgeProvider::GitLab => Box::new(GitLabTokenCheck::new(host)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names() {
        assert_eq!(ForgeProvider::GitHub.name(), "github");
        assert_eq!(ForgeProvider::GitLab.name(), "gitlab");
        assert_eq!(ForgeProvider::GitHub.token_name(), "GitHub token");
        assert_eq!(ForgeProvider::GitLab.token_name(), "GitLab token");
    }

    #[test]
    fn factory_picks_matching_backend() {
        let remote = RemoteDescriptor {
            host: "github.com".to_string(),
            repo_path: "owner/repo".to_string(),
        };
        let forge = create_forge(ForgeProvider::GitHub, &remote, "token");
        assert_eq!(forge.name(), "github");

        let forge = create_forge(ForgeProvider::GitLab, &remote, "token");
        assert_eq!(forge.name(), "gitlab");
    }
}
