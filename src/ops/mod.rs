// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for graph documents.
//!
//! A batch of ops is applied all-or-nothing against a working copy and produces a minimal
//! delta the surface can use to refresh derived state. History is the editor's concern, not
//! this module's.

use std::collections::BTreeSet;
use std::fmt;

use smol_str::SmolStr;

use crate::geometry::GeometryRule;
use crate::model::{
    Edge, EdgeId, GraphDocument, MetadataValue, Node, NodeId, Position, Size,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    AddNode {
        node: Node,
    },
    Connect {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
    RemoveNode {
        node_id: NodeId,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    /// Removes every selected node and edge, cascading edges of removed nodes.
    RemoveSelected,
    MoveNode {
        node_id: NodeId,
        position: Position,
    },
    ResizeNode {
        node_id: NodeId,
        size: Size,
    },
    UpdateMetadata {
        node_id: NodeId,
        field: MetadataField,
        value: MetadataValue,
    },
    UpdateStyle {
        node_id: NodeId,
        patch: NodeStylePatch,
    },
}

/// A metadata key as typed into a property panel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetadataField {
    Name,
    Description,
    Area,
    Extra(SmolStr),
}

impl MetadataField {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Area => "area",
            Self::Extra(key) => key.as_str(),
        }
    }
}

impl From<&str> for MetadataField {
    fn from(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "description" => Self::Description,
            "area" => Self::Area,
            other => Self::Extra(SmolStr::new(other)),
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStylePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub label: Option<String>,
}

impl NodeStylePatch {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.color.is_none() && self.label.is_none()
    }
}

/// Settings the ops need beyond the document itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyContext {
    pub geometry: GeometryRule,
    pub allow_self_loops: bool,
}

impl Default for ApplyContext {
    fn default() -> Self {
        Self {
            geometry: GeometryRule::default(),
            allow_self_loops: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKey {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// Coarse on purpose: only added/removed/updated keys are reported, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectKey>,
    pub removed: Vec<ObjectKey>,
    pub updated: Vec<ObjectKey>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ObjectKey>,
    removed: BTreeSet<ObjectKey>,
    updated: BTreeSet<ObjectKey>,
}

impl DeltaBuilder {
    fn record_added(&mut self, key: ObjectKey) {
        self.removed.remove(&key);
        self.updated.remove(&key);
        self.added.insert(key);
    }

    fn record_removed(&mut self, key: ObjectKey) {
        // Added then removed within one batch leaves no trace.
        if self.added.remove(&key) {
            self.updated.remove(&key);
            return;
        }
        self.updated.remove(&key);
        self.removed.insert(key);
    }

    fn record_updated(&mut self, key: ObjectKey) {
        if self.added.contains(&key) || self.removed.contains(&key) {
            return;
        }
        self.updated.insert(key);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies `ops` in order. On error the document is left untouched.
pub fn apply_ops(
    document: &mut GraphDocument,
    ops: &[EditOp],
    ctx: &ApplyContext,
) -> Result<ApplyResult, EditError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut working = document.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut working, op, ctx, &mut delta)?;
    }

    *document = working;
    Ok(ApplyResult {
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("node not found (id={node_id})")]
    NodeNotFound { node_id: NodeId },
    #[error("edge not found (id={edge_id})")]
    EdgeNotFound { edge_id: EdgeId },
    #[error("object already exists ({kind:?}, id={id})")]
    AlreadyExists { kind: ObjectKind, id: String },
    #[error("self-loop edges are disabled (node={node_id})")]
    SelfLoopRejected { node_id: NodeId },
    #[error("invalid value for metadata field '{field}': {reason}")]
    InvalidMetadata {
        field: MetadataField,
        reason: &'static str,
    },
    #[error("invalid node size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("invalid node position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },
    #[error("no free {kind:?} id left in the numeric sequence")]
    IdSpaceExhausted { kind: ObjectKind },
}

// Per-op application logic.
include!("ops_impl.rs");
