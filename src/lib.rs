//! Easy Merge - create a merge request from the current branch
//!
//! Easy Merge (`em`) turns the latest commit into a merge request in
//! one step: it works out whether the remote is GitHub or GitLab by
//! probing the host, derives a branch name and request text from the
//! commit message, pushes, and opens the request. With `--merge` it
//! also merges the request and brings the local checkout back in line.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, runs the flow)
//! - [`naming`] - Branch-name derivation from commit messages
//! - [`host`] - Remote URL parsing and platform detection
//! - [`git`] - Single interface for all Git operations
//! - [`forge`] - Abstraction for remote forges (GitHub, GitLab)
//! - [`auth`] - Token acquisition and validation
//! - [`secrets`] - Secret storage abstraction
//! - [`ui`] - User interaction utilities

pub mod auth;
pub mod cli;
pub mod forge;
pub mod git;
pub mod host;
pub mod naming;
pub mod secrets;
pub mod ui;
