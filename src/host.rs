//! host
//!
//! Works out which platform a git remote points at.
//!
//! Remote URLs come in scp-like (`git@host:path.git`) and HTTP forms;
//! [`RemoteDescriptor::parse`] reduces both to a hostname and a
//! repository path. [`PlatformProbe`] then asks the host itself which
//! API it speaks: GitLab answers `GET /api/v4` with JSON, so we probe
//! `api.<host>` first (GitHub's API subdomain, which also serves JSON)
//! and fall back to the host directly.

use regex::Regex;
use thiserror::Error;

use crate::forge::ForgeProvider;

/// Errors from remote resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The remote URL did not yield a host and repository path.
    #[error("could not parse remote URL: {url}")]
    UnparsableRemote {
        /// The URL as configured on the remote
        url: String,
    },

    /// Neither probe found a known API on the host.
    #[error("no GitHub or GitLab API found at {host}")]
    UnknownPlatform {
        /// The hostname that was probed
        host: String,
    },
}

/// Host and repository path extracted from a remote URL.
///
/// # Examples
///
/// ```
/// use easy_merge::host::RemoteDescriptor;
///
/// let remote = RemoteDescriptor::parse("git@github.example.com:org/repo.git").unwrap();
/// assert_eq!(remote.host, "github.example.com");
/// assert_eq!(remote.repo_path, "org/repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    /// Hostname the remote points at
    pub host: String,
    /// Repository path on that host, without a leading slash or `.git`
    pub repo_path: String,
}

impl RemoteDescriptor {
    /// Parse a configured remote URL.
    ///
    /// # Errors
    ///
    /// `ResolveError::UnparsableRemote` when no host or repository path
    /// can be found.
    pub fn parse(url: &str) -> Result<Self, ResolveError> {
        let unparsable = || ResolveError::UnparsableRemote {
            url: url.to_string(),
        };

        // Strip the scheme or the user@ prefix, leaving host[:or/]path.
        let stripped = if let Some(rest) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        {
            rest.trim_start_matches('/')
        } else if let Some(at) = url.rfind('@') {
            &url[at + 1..]
        } else {
            url
        };

        let host_re = Regex::new(r"([A-Za-z0-9.-]+)[:/]").expect("static host pattern");
        let host = host_re
            .captures(stripped)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(unparsable)?;

        // scp-style separates host and path with a colon; URLs use a slash.
        let path_start = stripped
            .find(':')
            .or_else(|| stripped.find('/'))
            .ok_or_else(unparsable)?;
        let repo_path = stripped[path_start + 1..]
            .trim_end_matches(".git")
            .trim_matches('/')
            .to_string();
        if repo_path.is_empty() {
            return Err(unparsable());
        }

        Ok(Self { host, repo_path })
    }
}

/// Probes a host to decide which platform API it serves.
pub struct PlatformProbe {
    client: reqwest::Client,
    json_re: Regex,
}

impl PlatformProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            json_re: Regex::new(r"^application/json").expect("static content-type pattern"),
        }
    }

    /// Whether `GET <base>/api/v4` answers with a JSON content type.
    /// Connection failures and non-JSON answers both read as "no".
    pub async fn serves_json_api(&self, base: &str) -> bool {
        let response = match self.client.get(format!("{base}/api/v4")).send().await {
            Ok(response) => response,
            Err(_) => return false,
        };
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| self.json_re.is_match(value))
    }

    /// Decide which platform serves this host.
    ///
    /// # Errors
    ///
    /// `ResolveError::UnknownPlatform` when neither probe answers with
    /// JSON.
    pub async fn detect(&self, host: &str) -> Result<ForgeProvider, ResolveError> {
        if self.serves_json_api(&format!("https://api.{host}")).await {
            return Ok(ForgeProvider::GitHub);
        }
        if self.serves_json_api(&format!("https://{host}")).await {
            return Ok(ForgeProvider::GitLab);
        }
        Err(ResolveError::UnknownPlatform {
            host: host.to_string(),
        })
    }
}

impl Default for PlatformProbe {
    fn default() -> Self {
        Self::new()
    }
}
