//! secrets
//!
//! Token storage. The [`SecretStore`] trait is the only surface the
//! rest of the crate sees; the keychain store backs it with the
//! OS credential manager, and the in-memory store backs tests.
//!
//! Secret values never appear in log or error output.

mod keychain_store;
mod memory_store;
mod traits;

pub use keychain_store::KeychainSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};
