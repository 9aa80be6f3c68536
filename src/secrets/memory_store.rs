use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{SecretError, SecretStore};

/// In-memory secret store for tests.
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, key: &str) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SecretError> {
        self.secrets.lock().map_err(|_| SecretError::StoreFailure {
            key: key.to_string(),
            message: "store lock poisoned".to_string(),
        })
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.lock(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        self.lock(key)?.remove(key);
        Ok(())
    }
}
