//! auth
//!
//! Token acquisition and validation.
//!
//! # Design
//!
//! The [`CredentialGate`] owns the loop of "try the stored token, ask
//! the user on failure, give up after a bounded number of entries".
//! Validation goes through the [`TokenCheck`] trait so the gate never
//! knows which platform it is talking to. A token is written back to
//! the store only after the platform accepts it, and only when the
//! user typed it this run.

use async_trait::async_trait;
use thiserror::Error;

use crate::forge::ForgeError;
use crate::secrets::{SecretError, SecretStore};
use crate::ui::prompts::PromptError;

/// Interactive entries allowed before giving up.
pub const DEFAULT_MAX_TRIES: u32 = 3;

/// Errors from token acquisition.
#[derive(Debug, Error)]
pub enum GateError {
    /// The user ran out of attempts.
    #[error("could not validate {name} after {tries} attempts")]
    Exhausted {
        /// Display name of the credential
        name: String,
        /// Entries that were consumed
        tries: u32,
    },

    /// The secret store failed.
    #[error(transparent)]
    Store(#[from] SecretError),

    /// The prompt failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Asks a platform whether a token is currently valid.
#[async_trait]
pub trait TokenCheck: Send + Sync {
    /// # Errors
    ///
    /// Any `ForgeError` means the token was not accepted; the variant
    /// says why.
    async fn check(&self, token: &str) -> Result<(), ForgeError>;
}

/// Obtains a validated token, prompting interactively when needed.
pub struct CredentialGate<'a> {
    store: &'a dyn SecretStore,
    token_name: &'a str,
    max_tries: u32,
}

impl<'a> CredentialGate<'a> {
    pub fn new(store: &'a dyn SecretStore, token_name: &'a str) -> Self {
        Self {
            store,
            token_name,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Produce a token the platform accepts.
    ///
    /// The stored token is validated first without consuming an entry.
    /// Each failure prompts for a fresh token until `max_tries` entries
    /// have been consumed. Empty tokens fail without a network call.
    /// An accepted token is persisted only when it was entered this
    /// run.
    ///
    /// # Errors
    ///
    /// `GateError::Exhausted` after `max_tries` rejected entries, or
    /// store/prompt failures.
    pub async fn obtain<F>(
        &self,
        check: &dyn TokenCheck,
        mut prompt: F,
    ) -> Result<String, GateError>
    where
        F: FnMut(&str) -> Result<String, PromptError>,
    {
        let mut token = self.store.get(self.token_name)?.unwrap_or_default();
        let mut entered = false;
        let mut entries = 0;

        loop {
            if !token.is_empty() && check.check(&token).await.is_ok() {
                if entered {
                    self.store.set(self.token_name, &token)?;
                }
                return Ok(token);
            }

            if entries == self.max_tries {
                return Err(GateError::Exhausted {
                    name: self.token_name.to_string(),
                    tries: self.max_tries,
                });
            }

            token = prompt(self.token_name)?;
            entered = true;
            entries += 1;
        }
    }
}
