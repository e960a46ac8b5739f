// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ids::NodeId;

pub const DEFAULT_NODE_KIND: &str = "custom";
pub const DEFAULT_NODE_COLOR: &str = "#00BFFF";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Width divided by height, or `1.0` when the ratio is undefined.
    pub fn aspect_ratio(&self) -> f64 {
        let ratio = self.width / self.height;
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}

/// An extensible metadata entry: either free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
}

impl MetadataValue {
    /// Numeric view of the value; text is parsed leniently (trimmed).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    name: String,
    description: String,
    area: f64,
    extra: BTreeMap<SmolStr, MetadataValue>,
}

impl NodeMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>, area: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            area,
            extra: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn set_area(&mut self, area: f64) {
        self.area = area;
    }

    pub fn extra(&self) -> &BTreeMap<SmolStr, MetadataValue> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut BTreeMap<SmolStr, MetadataValue> {
        &mut self.extra
    }
}

/// A positioned, sized, colored vertex of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_id: NodeId,
    kind: String,
    position: Position,
    size: Size,
    color: String,
    label: String,
    metadata: NodeMetadata,
    selected: bool,
}

impl Node {
    pub fn new(node_id: NodeId, position: Position, size: Size) -> Self {
        let label = format!("Node {node_id}");
        Self {
            metadata: NodeMetadata::new(label.clone(), String::new(), size.area()),
            node_id,
            kind: DEFAULT_NODE_KIND.to_owned(),
            position,
            size,
            color: DEFAULT_NODE_COLOR.to_owned(),
            label,
            selected: false,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut NodeMetadata {
        &mut self.metadata
    }

    pub fn set_metadata(&mut self, metadata: NodeMetadata) {
        self.metadata = metadata;
    }

    /// Transient UI flag; never persisted.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::{MetadataValue, Node, Position, Size};
    use crate::model::NodeId;

    #[test]
    fn new_node_derives_label_and_area() {
        let node = Node::new(
            NodeId::new("3").expect("node id"),
            Position::new(1.0, 2.0),
            Size::new(150.0, 150.0),
        );
        assert_eq!(node.label(), "Node 3");
        assert_eq!(node.metadata().name(), "Node 3");
        assert_eq!(node.metadata().area(), 22_500.0);
        assert_eq!(node.kind(), "custom");
        assert!(!node.is_selected());
    }

    #[test]
    fn aspect_ratio_defaults_to_one_when_undefined() {
        assert_eq!(Size::new(200.0, 100.0).aspect_ratio(), 2.0);
        assert_eq!(Size::new(10.0, 0.0).aspect_ratio(), 1.0);
        assert_eq!(Size::new(0.0, 0.0).aspect_ratio(), 1.0);
    }

    #[test]
    fn metadata_value_parses_numeric_text() {
        assert_eq!(MetadataValue::from(" 40000 ").as_number(), Some(40_000.0));
        assert_eq!(MetadataValue::from("aisle").as_number(), None);
        assert_eq!(MetadataValue::from(12.5).to_string(), "12.5");
    }

    #[test]
    fn metadata_value_is_untagged_in_json() {
        let number: MetadataValue = serde_json::from_str("3").expect("number");
        let text: MetadataValue = serde_json::from_str("\"dairy\"").expect("text");
        assert_eq!(number, MetadataValue::Number(3.0));
        assert_eq!(text, MetadataValue::Text("dairy".to_owned()));
    }
}
