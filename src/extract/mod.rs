//! Extract — untrusted completion text to a validated [`Diagram`].
//!
//! DESIGN
//! ======
//! Stages run strictly in order, each returning `Result<_, StageFailure>`:
//!
//! 1. content check: trimmed text must be non-empty
//! 2. unwrap: strip code fences; a JSON string literal is decoded once
//! 3. block: take the first brace-balanced `{...}`
//! 4. parse: direct parse, else one trailing-comma repair and a retry
//! 5. lenient coercion, then strict validation (with the raw-strict path
//!    when coercion fails outright)
//!
//! [`extract_diagram`] is the only place a failure becomes the empty fallback.
//! It never panics and never returns an error; every failure is described in
//! [`Diagnostics`].

pub mod diagnostics;
pub mod json_block;
pub mod lenient;
pub mod repair;

use std::borrow::Cow;

use tracing::{debug, info, warn};

pub use diagnostics::{Diagnostics, Resolution};

use crate::diagram::{Diagram, join_issues, validate_strict};
use crate::llm::ChatEnvelope;
use json_block::BlockError;
use repair::ParseFailure;

/// A diagram plus the record of how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub diagram: Diagram,
    pub diagnostics: Diagnostics,
}

/// Why the pipeline fell back to the empty diagram.
#[derive(Debug, thiserror::Error)]
enum StageFailure {
    #[error("empty completion content")]
    EmptyContent,

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error("{}", .0.error)]
    Parse(ParseFailure),

    #[error("{0}")]
    Validation(String),
}

impl StageFailure {
    fn stage(&self) -> &'static str {
        match self {
            Self::EmptyContent => "content",
            Self::Block(_) => "block",
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validate",
        }
    }

    fn record(self, diagnostics: &mut Diagnostics) {
        match self {
            Self::EmptyContent => diagnostics.extraction_error = Some(Self::EmptyContent.to_string()),
            Self::Block(e) => diagnostics.extraction_error = Some(e.to_string()),
            Self::Parse(f) => {
                diagnostics.parse_error = Some(f.error);
                diagnostics.repair_applied = f.repair_applied;
            }
            Self::Validation(message) => diagnostics.validation_error = Some(message),
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Run the full recovery pipeline over raw completion text.
#[must_use]
pub fn extract_diagram(raw: &str) -> Extraction {
    let mut diagnostics = Diagnostics::new(raw);

    match run_stages(raw, &mut diagnostics) {
        Ok(diagram) => {
            info!(
                nodes = diagram.nodes.len(),
                edges = diagram.edges.len(),
                resolution = ?diagnostics.resolution,
                repaired = diagnostics.repair_applied.is_some(),
                "extract: diagram recovered"
            );
            Extraction { diagram, diagnostics }
        }
        Err(failure) => {
            warn!(stage = failure.stage(), error = %failure, "extract: falling back to empty diagram");
            failure.record(&mut diagnostics);
            diagnostics.used_fallback = true;
            Extraction { diagram: Diagram::empty(), diagnostics }
        }
    }
}

/// Flatten a provider envelope to text and run [`extract_diagram`] on it.
#[must_use]
pub fn extract_from_envelope(envelope: &ChatEnvelope) -> Extraction {
    extract_diagram(&envelope.text_content())
}

// =============================================================================
// STAGES
// =============================================================================

fn run_stages(raw: &str, diagnostics: &mut Diagnostics) -> Result<Diagram, StageFailure> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(StageFailure::EmptyContent);
    }

    let unfenced = json_block::strip_code_fences(content);
    let decoded = repair::unwrap_double_encoded(&unfenced);
    if let Cow::Owned(_) = decoded {
        debug!("extract: decoded double-encoded completion");
    }
    let block = json_block::extract_json_block(&decoded)?;
    debug!(block_len = block.len(), "extract: json block located");
    diagnostics.extracted_json = Some(block.to_string());

    let parsed = repair::parse_with_repair(block).map_err(StageFailure::Parse)?;
    if let Some(repair) = &parsed.repair_applied {
        info!(repair = %repair, "extract: parse succeeded after repair");
    }
    diagnostics.repair_applied = parsed.repair_applied;

    resolve(&parsed.value, diagnostics)
}

/// Lenient coercion followed by strict validation.
fn resolve(value: &serde_json::Value, diagnostics: &mut Diagnostics) -> Result<Diagram, StageFailure> {
    let lenient_err = match lenient::coerce(value) {
        Ok(coerced) => {
            diagnostics.duplicate_nodes_dropped = coerced.duplicates_dropped;
            if coerced.nodes_discarded > 0 || coerced.edges_discarded > 0 || coerced.duplicates_dropped > 0 {
                debug!(
                    nodes_discarded = coerced.nodes_discarded,
                    edges_discarded = coerced.edges_discarded,
                    duplicates_dropped = coerced.duplicates_dropped,
                    "extract: lenient coercion dropped items"
                );
            }

            let issues = coerced.diagram.strict_issues();
            if issues.is_empty() {
                diagnostics.resolution = Some(Resolution::Strict);
            } else {
                let message = join_issues(&issues);
                warn!(issues = issues.len(), error = %message, "extract: strict validation failed, returning best effort");
                diagnostics.validation_error = Some(message);
                diagnostics.resolution = Some(Resolution::BestEffort);
            }
            return Ok(coerced.diagram);
        }
        Err(e) => e,
    };

    match validate_strict(value) {
        Ok(diagram) => {
            diagnostics.resolution = Some(Resolution::RawStrict);
            Ok(diagram)
        }
        Err(_) => Err(StageFailure::Validation(lenient_err.to_string())),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
