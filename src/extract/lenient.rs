//! Lenient schema coercion: loosely-shaped JSON to a canonical [`Diagram`].
//!
//! Each field is resolved by trying a fixed list of keys in priority order and
//! keeping the first value that is a non-empty string or a number. Anything
//! that cannot be resolved is dropped rather than rejected; only a wrong
//! top-level shape fails the stage.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::diagram::{Diagram, DiagramEdge, DiagramNode, ValidationIssue, join_issues, type_name};

/// Keys tried, in order, for a node's display label. The node id is the last resort.
pub const LABEL_KEYS: [&str; 4] = ["label", "name", "text", "title"];

/// Keys tried, in order, for an edge's source endpoint.
pub const FROM_KEYS: [&str; 2] = ["from", "source"];

/// Keys tried, in order, for an edge's target endpoint.
pub const TO_KEYS: [&str; 2] = ["to", "target"];

/// The value is not even an object with optional `nodes`/`edges` arrays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct LenientError {
    pub issues: Vec<ValidationIssue>,
}

/// Output of a successful coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coerced {
    pub diagram: Diagram,
    /// Nodes dropped because an earlier node already used the same id.
    pub duplicates_dropped: usize,
    /// Items dropped for lacking a usable id or endpoint.
    pub nodes_discarded: usize,
    pub edges_discarded: usize,
}

/// Coerce a parsed JSON value into a diagram.
///
/// # Errors
///
/// Returns a [`LenientError`] when the root is not an object or when `nodes`
/// or `edges` is present but not an array. `null` counts as absent.
pub fn coerce(value: &Value) -> Result<Coerced, LenientError> {
    let Some(root) = value.as_object() else {
        return Err(LenientError {
            issues: vec![ValidationIssue { path: String::new(), message: format!("expected object, got {}", type_name(value)) }],
        });
    };

    let mut issues = Vec::new();
    let node_items = optional_array(root, "nodes", &mut issues);
    let edge_items = optional_array(root, "edges", &mut issues);
    if !issues.is_empty() {
        return Err(LenientError { issues });
    }

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(node_items.len());
    let mut duplicates_dropped = 0;
    let mut nodes_discarded = 0;
    for item in node_items {
        let Some(node) = item.as_object().and_then(coerce_node) else {
            nodes_discarded += 1;
            continue;
        };
        if seen.insert(node.id.clone()) {
            nodes.push(node);
        } else {
            duplicates_dropped += 1;
        }
    }

    let mut edges = Vec::with_capacity(edge_items.len());
    let mut edges_discarded = 0;
    for item in edge_items {
        match item.as_object().and_then(coerce_edge) {
            Some(edge) => edges.push(edge),
            None => edges_discarded += 1,
        }
    }

    Ok(Coerced { diagram: Diagram { nodes, edges }, duplicates_dropped, nodes_discarded, edges_discarded })
}

fn optional_array<'a>(root: &'a Map<String, Value>, key: &str, issues: &mut Vec<ValidationIssue>) -> &'a [Value] {
    match root.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push(ValidationIssue {
                path: key.to_string(),
                message: format!("expected array, got {}", type_name(other)),
            });
            &[]
        }
    }
}

fn coerce_node(obj: &Map<String, Value>) -> Option<DiagramNode> {
    let id = obj.get("id").and_then(coerce_scalar)?;
    let label = first_present(obj, &LABEL_KEYS).unwrap_or_else(|| id.clone());
    Some(DiagramNode { id, label })
}

fn coerce_edge(obj: &Map<String, Value>) -> Option<DiagramEdge> {
    let from = first_present(obj, &FROM_KEYS)?;
    let to = first_present(obj, &TO_KEYS)?;
    Some(DiagramEdge { from, to })
}

/// First key in `keys` whose value coerces to a non-empty string.
fn first_present(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(coerce_scalar))
}

/// Strings (trimmed, non-empty) and numbers become strings; everything else is absent.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "lenient_test.rs"]
mod tests;
