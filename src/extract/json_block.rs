//! Locate the candidate JSON object inside free-form completion text.
//!
//! The scan counts `{`/`}` depth only. Braces inside string literals are not
//! special-cased, so a label such as `"a } b"` can end the block early; the
//! parse stage then reports the damage.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("no '{{' found in completion")]
    NoOpeningBrace,

    #[error("unbalanced braces: {depth} unclosed after scanning {scanned} characters")]
    Unbalanced { depth: usize, scanned: usize },
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("fence regex must compile"))
}

/// Remove every triple-backtick fence marker, with or without a `json` tag.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    fence_re().replace_all(text, "").into_owned()
}

/// Return the slice from the first `{` to its depth-matched `}` inclusive.
///
/// # Errors
///
/// [`BlockError::NoOpeningBrace`] when the text has no `{`;
/// [`BlockError::Unbalanced`] when the depth never returns to zero.
pub fn extract_json_block(text: &str) -> Result<&str, BlockError> {
    let start = text.find('{').ok_or(BlockError::NoOpeningBrace)?;
    let mut depth = 0usize;

    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(BlockError::Unbalanced { depth, scanned: text[start..].chars().count() })
}

#[cfg(test)]
#[path = "json_block_test.rs"]
mod tests;
