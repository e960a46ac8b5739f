// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::document::GraphDocument;
use super::edge::Edge;
use super::ids::{EdgeId, NodeId};
use super::node::{MetadataValue, Node, NodeMetadata, Position, Size};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

/// Entrance -> produce -> checkout, plus a wide storage room hanging off produce.
pub(crate) fn small_store() -> GraphDocument {
    let mut entrance = Node::new(nid("1"), Position::new(0.0, 0.0), Size::new(150.0, 150.0));
    entrance.set_metadata(NodeMetadata::new("Entrance", "Main doors", 22_500.0));

    let mut produce = Node::new(nid("2"), Position::new(200.0, 0.0), Size::new(200.0, 100.0));
    let mut produce_meta = NodeMetadata::new("Produce", "Fresh fruit and vegetables", 20_000.0);
    produce_meta
        .extra_mut()
        .insert("aisle".into(), MetadataValue::Number(4.0));
    produce.set_metadata(produce_meta);
    produce.set_color("#2E8B57");

    let mut checkout = Node::new(nid("3"), Position::new(450.0, 0.0), Size::new(150.0, 150.0));
    checkout.set_metadata(NodeMetadata::new("Checkout", "Registers", 22_500.0));

    let mut storage = Node::new(nid("4"), Position::new(200.0, 200.0), Size::new(300.0, 100.0));
    storage.set_metadata(NodeMetadata::new("Storage", "Back room", 30_000.0));

    let edges = vec![
        Edge::new(eid("e1"), nid("1"), nid("2")),
        Edge::new(eid("e2"), nid("2"), nid("3")),
        Edge::new(eid("e3"), nid("2"), nid("4")),
    ];

    GraphDocument::from_parts(vec![entrance, produce, checkout, storage], edges)
}
