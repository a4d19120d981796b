//! Diagram data model and strict validation.
//!
//! DESIGN
//! ======
//! A [`Diagram`] is the only artifact handed from the extractor to the layout
//! synthesizer. Edges are not checked for referential integrity here; the
//! synthesizer skips dangling references when it draws.
//!
//! Strict validation reports every violated invariant rather than stopping at
//! the first, so best-effort results can carry a complete diagnostic.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of nodes a strictly valid diagram may hold.
pub const MAX_NODES: usize = 200;

/// Maximum number of edges a strictly valid diagram may hold.
pub const MAX_EDGES: usize = 400;

/// Maximum length of a node id or edge endpoint, in characters.
pub const MAX_ID_LEN: usize = 100;

/// Maximum length of a node label, in characters.
pub const MAX_LABEL_LEN: usize = 200;

// =============================================================================
// TYPES
// =============================================================================

/// A single box in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
}

/// A directed connection between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
}

/// Validated graph of nodes and edges. Node order drives grid placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// One violated strict-schema invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location in the diagram, e.g. `nodes[3].label`. Empty for the root.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Render a list of issues as a single human-readable line.
#[must_use]
pub fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// DIAGRAM
// =============================================================================

impl Diagram {
    /// The fallback diagram: no nodes, no edges.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Check every strict invariant. An empty result means the diagram is valid.
    #[must_use]
    pub fn strict_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.nodes.len() > MAX_NODES {
            issues.push(ValidationIssue::new(
                "nodes",
                format!("too many nodes: {} (max {MAX_NODES})", self.nodes.len()),
            ));
        }
        if self.edges.len() > MAX_EDGES {
            issues.push(ValidationIssue::new(
                "edges",
                format!("too many edges: {} (max {MAX_EDGES})", self.edges.len()),
            ));
        }

        let mut seen = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            check_text(&mut issues, &format!("nodes[{i}].id"), &node.id, MAX_ID_LEN);
            check_text(&mut issues, &format!("nodes[{i}].label"), &node.label, MAX_LABEL_LEN);
            if !seen.insert(node.id.as_str()) {
                issues.push(ValidationIssue::new(
                    format!("nodes[{i}].id"),
                    format!("duplicate node id {:?}", node.id),
                ));
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            check_text(&mut issues, &format!("edges[{i}].from"), &edge.from, MAX_ID_LEN);
            check_text(&mut issues, &format!("edges[{i}].to"), &edge.to, MAX_ID_LEN);
        }

        issues
    }
}

fn check_text(issues: &mut Vec<ValidationIssue>, path: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len == 0 {
        issues.push(ValidationIssue::new(path, "must not be empty"));
    } else if len > max {
        issues.push(ValidationIssue::new(path, format!("too long: {len} characters (max {max})")));
    }
}

// =============================================================================
// STRICT VALIDATION OF RAW JSON
// =============================================================================

/// Validate an arbitrary JSON value against the strict diagram schema.
///
/// Unlike lenient coercion, this accepts only the canonical shape: an object
/// with `nodes` and `edges` arrays whose items carry string `id`/`label` and
/// `from`/`to` fields.
///
/// # Errors
///
/// Returns every violated invariant when the value is not a strictly valid diagram.
pub fn validate_strict(value: &Value) -> Result<Diagram, Vec<ValidationIssue>> {
    let Some(root) = value.as_object() else {
        return Err(vec![ValidationIssue::new("", format!("expected object, got {}", type_name(value)))]);
    };

    let mut issues = Vec::new();
    let nodes_raw = required_array(root, "nodes", &mut issues);
    let edges_raw = required_array(root, "edges", &mut issues);

    let nodes: Vec<DiagramNode> = nodes_raw
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let path = format!("nodes[{i}]");
            let id = required_string(item, &path, "id", &mut issues);
            let label = required_string(item, &path, "label", &mut issues);
            Some(DiagramNode { id: id?, label: label? })
        })
        .collect();

    let edges: Vec<DiagramEdge> = edges_raw
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let path = format!("edges[{i}]");
            let from = required_string(item, &path, "from", &mut issues);
            let to = required_string(item, &path, "to", &mut issues);
            Some(DiagramEdge { from: from?, to: to? })
        })
        .collect();

    let diagram = Diagram { nodes, edges };
    issues.extend(diagram.strict_issues());

    if issues.is_empty() { Ok(diagram) } else { Err(issues) }
}

fn required_array<'a>(
    root: &'a serde_json::Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> &'a [Value] {
    match root.get(key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push(ValidationIssue::new(key, format!("expected array, got {}", type_name(other))));
            &[]
        }
        None => {
            issues.push(ValidationIssue::new(key, "required"));
            &[]
        }
    }
}

fn required_string(item: &Value, path: &str, key: &str, issues: &mut Vec<ValidationIssue>) -> Option<String> {
    let Some(obj) = item.as_object() else {
        // Report the wrong item type once, against the first field checked.
        if key == "id" || key == "from" {
            issues.push(ValidationIssue::new(path, format!("expected object, got {}", type_name(item))));
        }
        return None;
    };
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(ValidationIssue::new(
                format!("{path}.{key}"),
                format!("expected string, got {}", type_name(other)),
            ));
            None
        }
        None => {
            issues.push(ValidationIssue::new(format!("{path}.{key}"), "required"));
            None
        }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "diagram_test.rs"]
mod tests;
