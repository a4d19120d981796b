//! End-to-end tests for the extraction pipeline.

use super::*;
use crate::diagram::{DiagramEdge, DiagramNode, MAX_EDGES, MAX_NODES};
use crate::llm::{ContentPart, MessageContent};

fn node(id: &str, label: &str) -> DiagramNode {
    DiagramNode { id: id.into(), label: label.into() }
}

// =============================================================================
// HAPPY PATHS
// =============================================================================

#[test]
fn fenced_json_wrapped_in_prose() {
    let raw = "Here is your architecture:\n```json\n{\"nodes\":[{\"id\":\"a\",\"label\":\"A\"}],\"edges\":[]}\n```\nLet me know if you want changes.";
    let out = extract_diagram(raw);
    assert_eq!(out.diagram.nodes, vec![node("a", "A")]);
    assert!(out.diagram.edges.is_empty());
    assert!(!out.diagnostics.used_fallback);
    assert_eq!(out.diagnostics.resolution, Some(Resolution::Strict));
    assert_eq!(
        out.diagnostics.extracted_json.as_deref(),
        Some("{\"nodes\":[{\"id\":\"a\",\"label\":\"A\"}],\"edges\":[]}")
    );
    assert_eq!(out.diagnostics.raw_text, raw);
}

#[test]
fn trailing_comma_repair() {
    let out = extract_diagram("{\"nodes\":[{\"id\":\"a\",\"label\":\"A\"},],\"edges\":[]}");
    assert_eq!(out.diagram.nodes, vec![node("a", "A")]);
    assert!(out.diagnostics.repair_applied.is_some());
    assert!(out.diagnostics.parse_error.is_none());
    assert!(!out.diagnostics.used_fallback);
}

#[test]
fn key_aliasing() {
    let out = extract_diagram("{\"nodes\":[{\"id\":\"x\",\"name\":\"X Node\"}],\"edges\":[{\"source\":\"x\",\"target\":\"x\"}]}");
    assert_eq!(out.diagram.nodes, vec![node("x", "X Node")]);
    assert_eq!(out.diagram.edges, vec![DiagramEdge { from: "x".into(), to: "x".into() }]);
    assert!(!out.diagnostics.used_fallback);
}

#[test]
fn json_encoded_completion_is_decoded() {
    let inner = "{\"nodes\":[{\"id\":\"a\",\"label\":\"A\"}],\"edges\":[]}";
    let raw = serde_json::to_string(inner).unwrap();
    let out = extract_diagram(&raw);
    assert_eq!(out.diagram.nodes, vec![node("a", "A")]);
    assert!(!out.diagnostics.used_fallback);
    assert!(out.diagnostics.parse_error.is_none());
    assert_eq!(out.diagnostics.extracted_json.as_deref(), Some(inner));
    assert_eq!(out.diagnostics.raw_text, raw);
}

#[test]
fn fenced_json_encoded_completion_is_decoded() {
    let inner = "{\"nodes\":[{\"id\":\"a\",\"label\":\"A\"},],\"edges\":[]}";
    let raw = format!("```json\n{}\n```", serde_json::to_string(inner).unwrap());
    let out = extract_diagram(&raw);
    assert_eq!(out.diagram.nodes, vec![node("a", "A")]);
    assert!(out.diagnostics.repair_applied.is_some());
    assert!(!out.diagnostics.used_fallback);
}

#[test]
fn json_string_without_a_diagram_falls_back() {
    let out = extract_diagram("\"no diagram today\"");
    assert!(out.diagram.is_empty());
    assert!(out.diagnostics.used_fallback);
    assert!(out.diagnostics.extraction_error.is_some());
}

#[test]
fn nested_braces_in_trailing_prose_are_ignored() {
    let out = extract_diagram("{\"nodes\":[{\"id\":\"a\"}]} and also {\"nodes\":[{\"id\":\"b\"}]}");
    assert_eq!(out.diagram.nodes, vec![node("a", "a")]);
}

#[test]
fn empty_object_is_valid_and_not_a_fallback() {
    let out = extract_diagram("{}");
    assert!(out.diagram.is_empty());
    assert!(!out.diagnostics.used_fallback);
    assert_eq!(out.diagnostics.resolution, Some(Resolution::Strict));
}

#[test]
fn duplicates_are_counted() {
    let out = extract_diagram(r#"{"nodes":[{"id":"a"},{"id":"a","label":"again"}],"edges":[]}"#);
    assert_eq!(out.diagram.nodes, vec![node("a", "a")]);
    assert_eq!(out.diagnostics.duplicate_nodes_dropped, 1);
}

#[test]
fn envelope_parts_feed_the_pipeline() {
    let envelope = ChatEnvelope {
        model: Some("m".into()),
        content: MessageContent::Parts(vec![
            ContentPart { kind: "text".into(), text: Some(serde_json::json!("Diagram:")) },
            ContentPart { kind: "refusal".into(), text: Some(serde_json::json!("{\"nodes\":\"nope\"}")) },
            ContentPart { kind: "text".into(), text: Some(serde_json::json!("{\"nodes\":[{\"id\":\"db\"}]}")) },
        ]),
    };
    let out = extract_from_envelope(&envelope);
    assert_eq!(out.diagram.nodes, vec![node("db", "db")]);
    assert_eq!(out.diagnostics.raw_text, "Diagram:\n{\"nodes\":[{\"id\":\"db\"}]}");
}

// =============================================================================
// BEST EFFORT
// =============================================================================

#[test]
fn over_cap_nodes_are_returned_best_effort() {
    let nodes: Vec<serde_json::Value> = (0..=MAX_NODES)
        .map(|i| serde_json::json!({ "id": format!("n{i}"), "label": "N" }))
        .collect();
    let raw = serde_json::json!({ "nodes": nodes, "edges": [] }).to_string();
    let out = extract_diagram(&raw);
    assert_eq!(out.diagram.nodes.len(), MAX_NODES + 1);
    assert!(!out.diagnostics.used_fallback);
    assert_eq!(out.diagnostics.resolution, Some(Resolution::BestEffort));
    assert!(out.diagnostics.validation_error.as_deref().unwrap().contains("too many nodes"));
}

#[test]
fn over_cap_edges_are_returned_best_effort() {
    let edges: Vec<serde_json::Value> = (0..=MAX_EDGES).map(|_| serde_json::json!({ "from": "a", "to": "a" })).collect();
    let raw = serde_json::json!({ "nodes": [{ "id": "a" }], "edges": edges }).to_string();
    let out = extract_diagram(&raw);
    assert_eq!(out.diagram.edges.len(), MAX_EDGES + 1);
    assert_eq!(out.diagnostics.resolution, Some(Resolution::BestEffort));
}

#[test]
fn over_long_label_is_returned_best_effort() {
    let raw = serde_json::json!({ "nodes": [{ "id": "a", "label": "x".repeat(300) }] }).to_string();
    let out = extract_diagram(&raw);
    assert_eq!(out.diagram.nodes.len(), 1);
    assert!(out.diagnostics.validation_error.as_deref().unwrap().starts_with("nodes[0].label"));
}

// =============================================================================
// FALLBACKS
// =============================================================================

#[test]
fn total_garbage_falls_back() {
    let out = extract_diagram("I'm sorry, I can't help with that request.");
    assert_eq!(out.diagram, Diagram::empty());
    assert!(out.diagnostics.used_fallback);
    assert_eq!(out.diagnostics.extraction_error.as_deref(), Some("no '{' found in completion"));
    assert!(out.diagnostics.extracted_json.is_none());
}

#[test]
fn empty_content_falls_back() {
    let out = extract_diagram("   \n ");
    assert!(out.diagram.is_empty());
    assert!(out.diagnostics.used_fallback);
    assert_eq!(out.diagnostics.extraction_error.as_deref(), Some("empty completion content"));
}

#[test]
fn unbalanced_block_falls_back() {
    let out = extract_diagram("```json\n{\"nodes\":[{\"id\":\"a\"}\n```");
    assert!(out.diagnostics.used_fallback);
    assert!(out.diagnostics.extraction_error.as_deref().unwrap().contains("unbalanced"));
}

#[test]
fn unparseable_block_falls_back_with_parse_error() {
    let out = extract_diagram("{nodes: [a, b,]}");
    assert!(out.diagnostics.used_fallback);
    assert!(out.diagnostics.parse_error.is_some());
    assert!(out.diagnostics.repair_applied.is_some());
    assert_eq!(out.diagnostics.extracted_json.as_deref(), Some("{nodes: [a, b,]}"));
}

#[test]
fn wrong_shape_falls_back_with_validation_error() {
    let out = extract_diagram(r#"{"nodes": "api, db", "edges": 3}"#);
    assert!(out.diagram.is_empty());
    assert!(out.diagnostics.used_fallback);
    assert_eq!(
        out.diagnostics.validation_error.as_deref(),
        Some("nodes: expected array, got string; edges: expected array, got number")
    );
    assert!(out.diagnostics.resolution.is_none());
}

#[test]
fn diagnostics_serialize_camel_case() {
    let out = extract_diagram("nothing here");
    let value = serde_json::to_value(&out.diagnostics).unwrap();
    assert_eq!(value["usedFallback"], serde_json::json!(true));
    assert_eq!(value["repairApplied"], serde_json::Value::Null);
    assert_eq!(value["rawText"], serde_json::json!("nothing here"));
}
