//! git::interface
//!
//! Git interface implemented over the `git` CLI.
//!
//! Every operation runs a single git subprocess in the repository
//! directory, blocks for completion, and normalizes failures into typed
//! [`GitError`] variants. Output is captured, trimmed, and returned as
//! UTF-8 text.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Fallback target when the remote does not advertise a default branch.
const FALLBACK_DEFAULT_BRANCH: &str = "master";

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was checked
        path: PathBuf,
    },

    /// The repository has no configured remotes.
    #[error("no git remote configured")]
    NoRemote,

    /// A git command exited with a non-zero status.
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// The subcommand and arguments that ran
        command: String,
        /// Trimmed stderr from git
        stderr: String,
    },

    /// Git produced output that is not valid UTF-8.
    #[error("git {command} produced non-UTF-8 output")]
    InvalidUtf8 {
        /// The subcommand that ran
        command: String,
    },

    /// The git binary could not be spawned.
    #[error("could not run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to a git repository, addressed by working directory.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// `GitError::NotARepo` when `path` is not inside a git work tree.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let git = Self {
            root: path.to_path_buf(),
        };
        match git.run(&["rev-parse", "--git-dir"]) {
            Ok(_) => Ok(git),
            Err(GitError::CommandFailed { .. }) => Err(GitError::NotARepo {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Run a git command and return its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()?;

        let command = args.join(" ");
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .map_err(|_| GitError::InvalidUtf8 { command })
    }

    /// Name of the first configured remote.
    pub fn first_remote(&self) -> Result<String, GitError> {
        let remotes = self.run(&["remote"])?;
        remotes
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(GitError::NoRemote)
    }

    /// Configured URL of a remote.
    pub fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.run(&["config", "--get", &format!("remote.{remote}.url")])
    }

    /// Full message of the latest commit, trimmed.
    pub fn head_message(&self) -> Result<String, GitError> {
        self.run(&["log", "--pretty=%B", "-n1"])
    }

    /// Short name of the currently checked-out branch.
    pub fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Default branch advertised by the remote, or `master` when the
    /// remote HEAD is not recorded locally.
    pub fn default_branch(&self, remote: &str) -> String {
        self.run(&[
            "symbolic-ref",
            "--short",
            &format!("refs/remotes/{remote}/HEAD"),
        ])
        .ok()
        .and_then(|full| {
            full.strip_prefix(&format!("{remote}/"))
                .map(|name| name.to_string())
        })
        .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string())
    }

    /// Whether a local branch of this name exists.
    pub fn branch_exists(&self, name: &str) -> bool {
        self.run(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{name}")])
            .is_ok()
    }

    /// Create a new branch at HEAD and check it out.
    pub fn create_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["checkout", "-b", name]).map(|_| ())
    }

    /// Push a branch to the remote.
    pub fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(&["push", remote, branch]).map(|_| ())
    }

    /// Fetch from the remote.
    pub fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.run(&["fetch", remote]).map(|_| ())
    }

    /// Force-delete a local branch.
    pub fn delete_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["branch", "-D", name]).map(|_| ())
    }

    /// Check out a branch tracking the remote's version, merging local
    /// work-tree changes into it.
    pub fn checkout_tracking(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(&[
            "checkout",
            "--merge",
            "--track",
            &format!("{remote}/{branch}"),
        ])
        .map(|_| ())
    }
}
