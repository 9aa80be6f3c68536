//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! The token prompt reads without echo so credentials never land in
//! terminal scrollback.

use std::io::Write;

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for masked input (e.g., passwords, tokens).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str) -> Result<String, PromptError> {
    print!("{}: ", message);
    std::io::stdout()
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    rpassword::read_password().map_err(|e| PromptError::IoError(e.to_string()))
}
