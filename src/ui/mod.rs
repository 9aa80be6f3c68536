//! ui
//!
//! Terminal input and output: verbosity-aware status printing and the
//! masked token prompt.

pub mod output;
pub mod prompts;
