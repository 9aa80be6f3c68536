//! forge
//!
//! Remote hosting service integration.
//!
//! The [`Forge`] trait abstracts over GitHub and GitLab; the factory
//! builds the right backend once the host has been identified. The
//! shared dispatch flow [`create_and_maybe_merge`] creates a request
//! and, when asked, merges it and removes its source branch.

mod factory;
pub mod github;
pub mod gitlab;
pub mod mock;
mod traits;

pub use factory::{create_forge, create_token_check, ForgeProvider};
pub use traits::{
    create_and_maybe_merge, CreatedRequest, DispatchOutcome, Forge, ForgeError, MergeMethod,
    MergeOutcome, MergeRequestSpec,
};
