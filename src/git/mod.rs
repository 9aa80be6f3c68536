//! git
//!
//! Single interface for all git operations.
//!
//! # Architecture
//!
//! This module is the only doorway to git. Every repository read and
//! mutation flows through [`Git`], which shells out to the `git` CLI so
//! that pushes and fetches reuse whatever transport credentials the user
//! already has configured. No other module spawns git processes.
//!
//! # Responsibilities
//!
//! - Remote discovery (`git remote`, `git config --get`)
//! - Commit-message and branch queries
//! - Branch checkout, push, fetch, and deletion

mod interface;

pub use interface::{Git, GitError};
