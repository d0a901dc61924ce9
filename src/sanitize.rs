//! Prompt text sanitization.
//!
//! The synthesis model is sensitive to stray structure in its prompt, so text
//! pulled out of lesson content is normalized into a short, flat string before
//! it is ever sent: smart quotes become plain apostrophes, bracket characters
//! are dropped entirely, whitespace runs collapse, and the result is capped at
//! [`MAX_TEXT_LEN`] characters.

use crate::error::{SpeechError, SpeechResult};

/// Maximum length of a synthesis prompt, in characters.
pub const MAX_TEXT_LEN: usize = 200;

/// Characters stripped outright to defend against prompt-structure injection.
const BRACKETS: [char; 6] = ['{', '}', '(', ')', '[', ']'];

/// Normalize arbitrary lesson text into a bounded, model-safe prompt payload.
///
/// Fails with [`SpeechError::EmptyInput`] when the original text trims to
/// empty. The emptiness check runs on the input before any transformation, so
/// an all-whitespace string is rejected up front rather than surviving as an
/// empty sanitized prompt.
pub fn sanitize(text: &str) -> SpeechResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SpeechError::EmptyInput);
    }

    let replaced: String = trimmed
        .chars()
        .filter(|c| !BRACKETS.contains(c))
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => '\'',
            other => other,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    Ok(collapsed.chars().take(MAX_TEXT_LEN).collect())
}
