use thiserror::Error;

/// Errors from secret storage.
///
/// Variants carry only the key name, never the secret value.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The platform credential store rejected the operation.
    #[error("credential store error for '{key}': {message}")]
    StoreFailure {
        /// The key involved
        key: String,
        /// What went wrong, from the backend
        message: String,
    },
}

/// Keyed storage for secret values.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret, `None` when the key has never been stored.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Store a secret, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove a secret. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Whether a secret is stored under this key.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}
