//! JSON parsing with a single mechanical repair, plus double-encoding unwrap.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// A successful parse, noting the repair that made it possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub value: Value,
    pub repair_applied: Option<String>,
}

/// Both parse attempts failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Error from the direct parse, followed by the post-repair error if one ran.
    pub error: String,
    pub repair_applied: Option<String>,
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("trailing comma regex must compile"))
}

/// Remove commas that directly precede `}` or `]`, repeating until none remain.
///
/// Returns the repaired text and the number of commas removed.
#[must_use]
pub fn remove_trailing_commas(text: &str) -> (String, usize) {
    let re = trailing_comma_re();
    let mut current = text.to_string();
    let mut removed = 0;
    loop {
        let count = re.find_iter(&current).count();
        if count == 0 {
            return (current, removed);
        }
        removed += count;
        current = re.replace_all(&current, "$1").into_owned();
    }
}

/// Parse `block` as JSON; on failure strip trailing commas and retry once.
///
/// # Errors
///
/// Returns a [`ParseFailure`] carrying the parse error(s) and the repair
/// attempted, if any.
pub fn parse_with_repair(block: &str) -> Result<Parsed, ParseFailure> {
    let first_err = match serde_json::from_str::<Value>(block) {
        Ok(value) => return Ok(Parsed { value, repair_applied: None }),
        Err(e) => e,
    };

    let (repaired, removed) = remove_trailing_commas(block);
    if removed == 0 {
        return Err(ParseFailure { error: first_err.to_string(), repair_applied: None });
    }

    let repair = format!("removed {removed} trailing comma(s)");
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => Ok(Parsed { value, repair_applied: Some(repair) }),
        Err(retry_err) => Err(ParseFailure {
            error: format!("{first_err}; after repair: {retry_err}"),
            repair_applied: Some(repair),
        }),
    }
}

/// If `text` is a JSON string literal, return its decoded contents; otherwise
/// return `text` unchanged.
///
/// A completion that was serialized twice arrives as `"{\"nodes\":...}"`,
/// which has no bare `{` for block extraction to find.
#[must_use]
pub fn unwrap_double_encoded(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    if !trimmed.starts_with('"') {
        return Cow::Borrowed(text);
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(inner)) => Cow::Owned(inner),
        _ => Cow::Borrowed(text),
    }
}

#[cfg(test)]
#[path = "repair_test.rs"]
mod tests;
