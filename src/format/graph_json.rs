// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The node/edge JSON shape consumed by the rendering surface and stored as `graph_json`.
//!
//! Export is strict. Import is best effort: malformed entries are skipped, wrong shapes
//! degrade to empty lists, and a payload that was JSON-encoded into a string (possibly more
//! than once) is unwrapped first.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;
use tracing::warn;

use crate::model::{
    Edge, EdgeId, GraphDocument, MetadataValue, Node, NodeId, NodeMetadata, Position, Size,
    DEFAULT_NODE_COLOR, DEFAULT_NODE_KIND,
};

const DEFAULT_SIZE: f64 = 150.0;
const MAX_STRING_UNWRAP_DEPTH: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentJson {
    #[serde(default)]
    nodes: Vec<Value>,
    #[serde(default)]
    edges: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeJson {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    position: Option<PositionJson>,
    #[serde(default)]
    style: Option<StyleJson>,
    #[serde(default)]
    data: Option<NodeDataJson>,
}

/// Coordinates are read loosely: `null`, numeric strings and missing axes all parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PositionJson {
    #[serde(default)]
    x: Option<Value>,
    #[serde(default)]
    y: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StyleJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeDataJson {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    metadata: MetadataJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MetadataJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    area: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<SmolStr, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeJson {
    id: String,
    source: String,
    target: String,
}

/// Serializes a document into the surface shape. Selection flags are not written.
pub fn document_to_value(document: &GraphDocument) -> Value {
    let nodes = document
        .nodes()
        .iter()
        .map(|node| {
            let size = node.size();
            let metadata = node.metadata();
            let node_json = NodeJson {
                id: node.node_id().to_string(),
                kind: Some(node.kind().to_owned()),
                position: Some(PositionJson {
                    x: Some(Value::from(node.position().x)),
                    y: Some(Value::from(node.position().y)),
                }),
                style: Some(StyleJson {
                    width: Some(size.width),
                    height: Some(size.height),
                }),
                data: Some(NodeDataJson {
                    label: Some(node.label().to_owned()),
                    color: Some(node.color().to_owned()),
                    width: Some(size.width),
                    height: Some(size.height),
                    metadata: MetadataJson {
                        name: Some(metadata.name().to_owned()),
                        description: Some(metadata.description().to_owned()),
                        area: Some(Value::from(metadata.area())),
                        extra: metadata
                            .extra()
                            .iter()
                            .map(|(key, value)| (key.clone(), metadata_value_to_json(value)))
                            .collect(),
                    },
                }),
            };
            serde_json::to_value(node_json).unwrap_or(Value::Null)
        })
        .collect();

    let edges = document
        .edges()
        .iter()
        .map(|edge| {
            serde_json::to_value(EdgeJson {
                id: edge.edge_id().to_string(),
                source: edge.source().to_string(),
                target: edge.target().to_string(),
            })
            .unwrap_or(Value::Null)
        })
        .collect();

    serde_json::to_value(DocumentJson { nodes, edges }).unwrap_or(Value::Null)
}

pub fn export_document(document: &GraphDocument) -> String {
    document_to_value(document).to_string()
}

/// Reads a document from either a structured value or a JSON-encoded string.
pub fn parse_document_value(value: &Value) -> GraphDocument {
    let mut decoded: Option<Value> = None;

    for depth in 0..=MAX_STRING_UNWRAP_DEPTH {
        let current = decoded.as_ref().unwrap_or(value);
        let Value::String(text) = current else {
            return document_from_structured(current);
        };
        if depth == MAX_STRING_UNWRAP_DEPTH {
            break;
        }
        let inner = match serde_json::from_str::<Value>(text) {
            Ok(inner) => inner,
            Err(err) => {
                warn!(error = %err, "graph payload string is not valid JSON; using empty document");
                return GraphDocument::new();
            }
        };
        decoded = Some(inner);
    }

    warn!(
        depth = MAX_STRING_UNWRAP_DEPTH,
        "graph payload nested too deeply in strings; using empty document"
    );
    GraphDocument::new()
}

pub fn parse_document_str(text: &str) -> GraphDocument {
    parse_document_value(&Value::String(text.to_owned()))
}

fn document_from_structured(value: &Value) -> GraphDocument {
    let Value::Object(map) = value else {
        warn!("graph payload is not an object; using empty document");
        return GraphDocument::new();
    };

    let nodes = match map.get("nodes") {
        Some(Value::Array(entries)) => {
            let mut seen = BTreeSet::new();
            entries
                .iter()
                .filter_map(node_from_json)
                .filter(|node| {
                    let fresh = seen.insert(node.node_id().clone());
                    if !fresh {
                        warn!(node_id = %node.node_id(), "skipping node with duplicate id");
                    }
                    fresh
                })
                .collect()
        }
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("graph payload `nodes` is not an array; ignoring");
            Vec::new()
        }
    };
    let edges = match map.get("edges") {
        Some(Value::Array(entries)) => {
            let mut seen = BTreeSet::new();
            entries
                .iter()
                .filter_map(edge_from_json)
                .filter(|edge| {
                    let fresh = seen.insert(edge.edge_id().clone());
                    if !fresh {
                        warn!(edge_id = %edge.edge_id(), "skipping edge with duplicate id");
                    }
                    fresh
                })
                .collect()
        }
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("graph payload `edges` is not an array; ignoring");
            Vec::new()
        }
    };

    let mut document = GraphDocument::from_parts(nodes, edges);
    let dropped = document.drop_dangling_edges();
    if !dropped.is_empty() {
        warn!(count = dropped.len(), "dropped edges pointing at missing nodes");
    }
    document
}

fn node_from_json(value: &Value) -> Option<Node> {
    let node_json = match NodeJson::deserialize(value) {
        Ok(node_json) => node_json,
        Err(err) => {
            warn!(error = %err, "skipping malformed node entry");
            return None;
        }
    };
    let node_id = match NodeId::new(node_json.id.clone()) {
        Ok(node_id) => node_id,
        Err(err) => {
            warn!(error = %err, id = %node_json.id, "skipping node with invalid id");
            return None;
        }
    };

    let style = node_json.style.unwrap_or_default();
    let data = node_json.data.unwrap_or_default();
    let position_json = node_json.position.unwrap_or_default();

    let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
    let width = positive(style.width)
        .or(positive(data.width))
        .unwrap_or(DEFAULT_SIZE);
    let height = positive(style.height)
        .or(positive(data.height))
        .unwrap_or(DEFAULT_SIZE);
    let size = Size::new(width, height);

    let position = Position::new(
        coordinate(position_json.x.as_ref()),
        coordinate(position_json.y.as_ref()),
    );

    let mut node = Node::new(node_id, position, size);
    node.set_kind(node_json.kind.unwrap_or_else(|| DEFAULT_NODE_KIND.to_owned()));
    node.set_color(data.color.unwrap_or_else(|| DEFAULT_NODE_COLOR.to_owned()));
    if let Some(label) = data.label {
        node.set_label(label);
    }

    let metadata_json = data.metadata;
    let area = metadata_json
        .area
        .as_ref()
        .and_then(json_number)
        .filter(|area| area.is_finite() && *area >= 0.0)
        .unwrap_or_else(|| size.area());
    let mut metadata = NodeMetadata::new(
        metadata_json.name.unwrap_or_else(|| node.label().to_owned()),
        metadata_json.description.unwrap_or_default(),
        area,
    );
    for (key, value) in metadata_json.extra {
        match metadata_value_from_json(&value) {
            Some(value) => {
                metadata.extra_mut().insert(key, value);
            }
            None => warn!(node_id = %node.node_id(), key = %key, "skipping non-scalar metadata entry"),
        }
    }
    node.set_metadata(metadata);

    Some(node)
}

fn edge_from_json(value: &Value) -> Option<Edge> {
    let edge_json = match EdgeJson::deserialize(value) {
        Ok(edge_json) => edge_json,
        Err(err) => {
            warn!(error = %err, "skipping malformed edge entry");
            return None;
        }
    };
    let ids = (
        EdgeId::new(edge_json.id),
        NodeId::new(edge_json.source),
        NodeId::new(edge_json.target),
    );
    match ids {
        (Ok(edge_id), Ok(source), Ok(target)) => Some(Edge::new(edge_id, source, target)),
        _ => {
            warn!("skipping edge with invalid id or endpoint");
            None
        }
    }
}

/// Missing, `null`, non-numeric or non-finite coordinates fall back to 0.
fn coordinate(value: Option<&Value>) -> f64 {
    value
        .and_then(json_number)
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn metadata_value_to_json(value: &MetadataValue) -> Value {
    match value {
        MetadataValue::Number(number) => Value::from(*number),
        MetadataValue::Text(text) => Value::from(text.as_str()),
    }
}

fn metadata_value_from_json(value: &Value) -> Option<MetadataValue> {
    match value {
        Value::Number(number) => number.as_f64().map(MetadataValue::Number),
        Value::String(text) => Some(MetadataValue::Text(text.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::{document_to_value, export_document, parse_document_str, parse_document_value};
    use crate::model::fixtures::{nid, small_store};
    use crate::model::{GraphDocument, MetadataValue, Position};

    #[test]
    fn export_uses_surface_shape() {
        let value = document_to_value(&small_store());

        let produce = &value["nodes"][1];
        assert_eq!(produce["id"], "2");
        assert_eq!(produce["type"], "custom");
        assert_eq!(produce["position"], json!({"x": 200.0, "y": 0.0}));
        assert_eq!(produce["style"], json!({"width": 200.0, "height": 100.0}));
        assert_eq!(produce["data"]["color"], "#2E8B57");
        assert_eq!(produce["data"]["metadata"]["name"], "Produce");
        assert_eq!(produce["data"]["metadata"]["aisle"], 4.0);
        assert_eq!(value["edges"][0], json!({"id": "e1", "source": "1", "target": "2"}));
    }

    #[test]
    fn export_never_writes_selection() {
        let mut doc = small_store();
        doc.node_mut(&nid("1")).expect("node").set_selected(true);
        let text = export_document(&doc);
        assert!(!text.contains("selected"));
    }

    #[test]
    fn string_and_structured_payloads_load_identically() {
        let structured = document_to_value(&small_store());
        let encoded = Value::String(structured.to_string());

        let from_structured = parse_document_value(&structured);
        let from_string = parse_document_value(&encoded);

        assert_eq!(from_structured, from_string);
        assert_eq!(from_structured, small_store());
    }

    #[test]
    fn doubly_encoded_payload_is_unwrapped() {
        let structured = document_to_value(&small_store());
        let once = Value::String(structured.to_string()).to_string();
        assert_eq!(parse_document_str(&once), small_store());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(42))]
    #[case(json!([1, 2, 3]))]
    #[case(json!("not json at all"))]
    #[case(json!({"nodes": "oops", "edges": {"a": 1}}))]
    fn wrong_shapes_fall_back_to_empty(#[case] payload: Value) {
        assert_eq!(parse_document_value(&payload), GraphDocument::new());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let payload = json!({
            "nodes": [
                {"id": "1", "position": {"x": 1, "y": 2}},
                {"position": {"x": 5, "y": 5}},
                {"id": "a/b"},
                "garbage",
                {"id": "2", "data": {"width": 200, "height": 100, "metadata": {"area": "20000", "tags": ["x"]}}}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2", "sourceHandle": null},
                {"id": "e2", "source": "1"},
                {"id": "e3", "source": "1", "target": "99"}
            ]
        });

        let doc = parse_document_value(&payload);

        assert_eq!(doc.nodes().len(), 2);
        assert_eq!(doc.edges().len(), 1);

        let first = doc.node(&nid("1")).expect("node 1");
        assert_eq!(first.size().width, 150.0);
        assert_eq!(first.metadata().area(), 22_500.0);
        assert_eq!(first.label(), "Node 1");

        let second = doc.node(&nid("2")).expect("node 2");
        assert_eq!(second.size().width, 200.0);
        assert_eq!(second.metadata().area(), 20_000.0);
        assert!(second.metadata().extra().is_empty());
    }

    #[test]
    fn legacy_payload_with_selection_and_extras_loads() {
        let payload = json!({
            "nodes": [{
                "id": "1",
                "type": "custom",
                "selected": true,
                "position": {"x": 12.5, "y": 40},
                "data": {
                    "label": "Node 1",
                    "color": "#00BFFF",
                    "width": 150,
                    "height": 150,
                    "metadata": {"name": "Node 1", "description": "Description for Node 1", "area": 1000, "shelves": 6, "zone": "A"}
                }
            }],
            "edges": []
        });

        let doc = parse_document_value(&Value::String(payload.to_string()));
        let node = doc.node(&nid("1")).expect("node");

        assert!(!node.is_selected());
        assert_eq!(node.metadata().area(), 1_000.0);
        assert_eq!(node.metadata().description(), "Description for Node 1");
        assert_eq!(node.metadata().extra().get("shelves"), Some(&MetadataValue::Number(6.0)));
        assert_eq!(node.metadata().extra().get("zone"), Some(&MetadataValue::from("A")));
    }

    #[test]
    fn loose_coordinates_fall_back_to_zero_and_keep_edges() {
        let payload = json!({
            "nodes": [
                {"id": "1", "position": {"x": null, "y": 3}},
                {"id": "2", "position": {"x": "12.5", "y": "aisle"}},
                {"id": "3", "position": null, "style": null, "data": null}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2"},
                {"id": "e2", "source": "2", "target": "3"}
            ]
        });

        let doc = parse_document_value(&payload);

        assert_eq!(doc.nodes().len(), 3);
        assert_eq!(doc.edges().len(), 2);
        assert_eq!(doc.node(&nid("1")).expect("node 1").position(), Position::new(0.0, 3.0));
        assert_eq!(doc.node(&nid("2")).expect("node 2").position(), Position::new(12.5, 0.0));
        assert_eq!(doc.node(&nid("3")).expect("node 3").position(), Position::new(0.0, 0.0));
    }

    #[test]
    fn duplicate_ids_keep_the_first_entry() {
        let payload = json!({
            "nodes": [
                {"id": "1", "data": {"label": "Entrance"}},
                {"id": "1", "data": {"label": "Shadow"}},
                {"id": "2"}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2"},
                {"id": "e1", "source": "2", "target": "1"}
            ]
        });

        let doc = parse_document_value(&payload);

        assert_eq!(doc.nodes().len(), 2);
        assert_eq!(doc.node(&nid("1")).expect("node 1").label(), "Entrance");
        assert_eq!(doc.edges().len(), 1);
        assert_eq!(doc.edges()[0].source(), &nid("1"));
    }

    #[test]
    fn ids_beyond_the_numeric_range_still_load() {
        let payload = json!({
            "nodes": [
                {"id": "18446744073709551615"},
                {"id": "99999999999999999999999"}
            ],
            "edges": []
        });

        let doc = parse_document_value(&payload);

        assert_eq!(doc.nodes().len(), 2);
        assert_eq!(doc.highest_node_seq(""), u64::MAX);
    }
}
