//! Observability record of what each extraction stage did.

use serde::Serialize;

/// How the returned diagram got past strict validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Lenient result passed strict validation.
    Strict,
    /// Lenient result failed strict validation and was returned anyway.
    BestEffort,
    /// Lenient coercion failed; the raw value passed strict validation.
    RawStrict,
}

/// Per-call diagnostics. Never affects the returned diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub raw_text: String,
    pub extracted_json: Option<String>,
    pub extraction_error: Option<String>,
    pub parse_error: Option<String>,
    pub repair_applied: Option<String>,
    pub validation_error: Option<String>,
    pub used_fallback: bool,
    pub resolution: Option<Resolution>,
    pub duplicate_nodes_dropped: usize,
}

impl Diagnostics {
    #[must_use]
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self { raw_text: raw_text.into(), ..Self::default() }
    }
}
