//! naming
//!
//! Derives git branch names from free-form commit messages.
//!
//! Git ref names forbid a set of characters and patterns (spaces, `..`,
//! `~`, `^`, `:` and friends). Rather than dropping those characters we
//! substitute full-width Unicode look-alikes, so the branch name stays
//! readable while satisfying `git check-ref-format`. The rewrites run in
//! a fixed order and the result of one feeds the next.

use regex::Regex;
use thiserror::Error;

/// Errors from branch-name derivation.
#[derive(Debug, Error)]
pub enum NamingError {
    /// The input produced nothing usable as a ref name.
    #[error("cannot derive a branch name from empty text")]
    EmptyResult,
}

/// Ordered rewrite rules. Each pattern is replaced everywhere it
/// matches before the next pattern runs.
const RULES: &[(&str, &str)] = &[
    // ASCII whitespace runs become a single no-break space.
    (r"\s+", "\u{00A0}"),
    (r"\.\.", "\u{FF0E}\u{FF0E}"),
    (r"\^", "\u{FF3E}"),
    (r"~", "\u{FF5E}"),
    // Leading and trailing slashes are forbidden; interior ones are fine.
    (r"^/|/$", "\u{FF0F}"),
    (r"//", "\u{FF0F}\u{FF0F}"),
    (r":", "\u{FF1A}"),
    (r"^\.|\.$", "\u{FF0E}"),
    (r"\?", "\u{FF1F}"),
    (r"\*", "\u{FF0A}"),
    (r"\[", "\u{FF3B}"),
    (r"@\{", "@\u{FF5B}"),
    (r"^@$", "\u{FF20}"),
    (r"\\", "\u{FF3C}"),
];

/// Rewrites arbitrary text into a valid git ref name.
///
/// # Examples
///
/// ```
/// use easy_merge::naming::RefNameSanitizer;
///
/// let sanitizer = RefNameSanitizer::new();
/// let name = sanitizer.sanitize("a..b^c~d").unwrap();
/// assert_eq!(name, "a\u{FF0E}\u{FF0E}b\u{FF3E}c\u{FF5E}d");
/// ```
pub struct RefNameSanitizer {
    rules: Vec<(Regex, &'static str)>,
}

impl RefNameSanitizer {
    /// Compile the rewrite rules.
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|(pattern, replacement)| {
                let re = Regex::new(pattern).expect("static rewrite pattern");
                (re, *replacement)
            })
            .collect();
        Self { rules }
    }

    /// Apply every rewrite in order and return the resulting ref name.
    ///
    /// # Errors
    ///
    /// `NamingError::EmptyResult` when the input (after rewriting) is
    /// empty.
    pub fn sanitize(&self, text: &str) -> Result<String, NamingError> {
        let mut result = text.to_string();
        for (re, replacement) in &self.rules {
            result = re.replace_all(&result, *replacement).into_owned();
        }
        if result.is_empty() {
            return Err(NamingError::EmptyResult);
        }
        Ok(result)
    }
}

impl Default for RefNameSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
