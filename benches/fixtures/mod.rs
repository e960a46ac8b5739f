// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use storemap::model::{
    Edge, EdgeId, GraphDocument, MetadataValue, Node, NodeId, NodeMetadata, Position, Size,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// 25 rooms.
    Small,
    /// 400 rooms with a few extra metadata entries each.
    Medium,
    /// 2500 rooms, every room wired to its right and lower neighbour.
    LargeDense,
}

impl Case {
    fn side(self) -> usize {
        match self {
            Self::Small => 5,
            Self::Medium => 20,
            Self::LargeDense => 50,
        }
    }
}

pub fn node_id(index: usize) -> NodeId {
    NodeId::from_seq("", index as u64 + 1)
}

/// A square grid of rooms; edges run right and down.
pub fn store_grid(case: Case) -> GraphDocument {
    let side = case.side();
    let mut nodes = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let index = row * side + col;
            let width = 100.0 + (index % 7) as f64 * 25.0;
            let height = 80.0 + (index % 5) as f64 * 20.0;
            let mut node = Node::new(
                node_id(index),
                Position::new(col as f64 * 250.0, row as f64 * 200.0),
                Size::new(width, height),
            );
            let mut metadata = NodeMetadata::new(
                format!("Room {index}"),
                format!("Aisle {row}, bay {col}"),
                width * height,
            );
            if case != Case::Small {
                metadata
                    .extra_mut()
                    .insert("aisle".into(), MetadataValue::Number(row as f64));
                metadata
                    .extra_mut()
                    .insert("zone".into(), MetadataValue::from(format!("Z{}", col / 5)));
            }
            node.set_metadata(metadata);
            nodes.push(node);
        }
    }

    let mut edges = Vec::new();
    let mut seq = 0u64;
    for row in 0..side {
        for col in 0..side {
            let index = row * side + col;
            let mut link = |to: usize| {
                seq += 1;
                edges.push(Edge::new(EdgeId::from_seq("e", seq), node_id(index), node_id(to)));
            };
            if col + 1 < side {
                link(index + 1);
            }
            if row + 1 < side && (case == Case::LargeDense || col % 2 == 0) {
                link(index + side);
            }
        }
    }

    GraphDocument::from_parts(nodes, edges)
}
