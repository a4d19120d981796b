use super::*;
use serde_json::json;

fn cell() -> Cell {
    Cell { x: 10.0, y: 20.0, width: 220.0, height: 100.0 }
}

#[test]
fn rectangle_serializes_flat() {
    let value = serde_json::to_value(VisualPrimitive::rectangle(cell())).unwrap();
    assert_eq!(value["type"], "rectangle");
    assert_eq!(value["x"], json!(10.0));
    assert_eq!(value["width"], json!(220.0));
    assert_eq!(value["backgroundColor"], SHAPE_FILL);
    assert_eq!(value["strokeColor"], SHAPE_STROKE);
    assert_eq!(value["roundness"], json!({ "type": 3 }));
    assert_eq!(value["isDeleted"], json!(false));
    assert_eq!(value["groupIds"], json!([]));
    assert!(value.get("text").is_none());
    assert!(value.get("points").is_none());
}

#[test]
fn label_carries_text_fields() {
    let config = LayoutConfig::default();
    let value = serde_json::to_value(VisualPrimitive::label("API", 1.0, 2.0, 40.0, &config)).unwrap();
    assert_eq!(value["type"], "text");
    assert_eq!(value["text"], "API");
    assert_eq!(value["originalText"], "API");
    assert_eq!(value["fontSize"], json!(16.0));
    assert_eq!(value["lineHeight"], json!(1.25));
    assert_eq!(value["height"], json!(20.0));
    assert_eq!(value["containerId"], serde_json::Value::Null);
    assert_eq!(value["backgroundColor"], "transparent");
}

#[test]
fn arrow_has_endpoint_only_arrowhead() {
    let value = serde_json::to_value(VisualPrimitive::arrow(5.0, 6.0, -30.0, 40.0)).unwrap();
    assert_eq!(value["type"], "arrow");
    assert_eq!(value["points"], json!([[0.0, 0.0], [-30.0, 40.0]]));
    assert_eq!(value["width"], json!(30.0));
    assert_eq!(value["height"], json!(40.0));
    assert_eq!(value["startArrowhead"], serde_json::Value::Null);
    assert_eq!(value["endArrowhead"], "arrow");
    assert_eq!(value["elbowed"], json!(false));
    assert!(value.get("text").is_none());
}

#[test]
fn identity_is_fresh_per_primitive() {
    let a = VisualPrimitive::rectangle(cell());
    let b = VisualPrimitive::rectangle(cell());
    assert_ne!(a.id, b.id);
    assert_eq!(a.version, 1);
    assert!(a.updated > 0);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
}
