//! Pre-extraction triviality check.
//!
//! Runs before any backend is called, so there is no intent yet; this is
//! a plain validation function rather than a [`Middleware`] stage.
//!
//! [`Middleware`]: super::Middleware

use std::collections::HashSet;

use super::PipelineError;

const MIN_WORDS: usize = 3;

const PUNCTUATION_MARKS: [&str; 6] = [".", ",", "!", "?", ";", ":"];

/// Fails when the phrase has fewer than three distinct non-punctuation
/// words — too trivial to be a task.
pub fn validate(message: &str) -> Result<(), PipelineError> {
    let words: HashSet<&str> = message
        .split_whitespace()
        .filter(|w| !PUNCTUATION_MARKS.contains(w))
        .collect();

    if words.len() < MIN_WORDS {
        return Err(PipelineError::TooShort { min: MIN_WORDS });
    }
    Ok(())
}
