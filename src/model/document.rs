// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::edge::Edge;
use super::ids::{EdgeId, NodeId};
use super::node::Node;

/// The editable map: ordered nodes plus ordered edges.
///
/// Order only matters for z-order/list order. The document does not validate its own
/// invariants; the editor keeps edges pointing at existing nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.node_id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.node_id() == node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.edge_id() == edge_id)
    }

    pub fn edge_mut(&mut self, edge_id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.edge_id() == edge_id)
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.touches(node_id))
    }

    pub fn selected_node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_selected())
            .map(|node| node.node_id().clone())
            .collect()
    }

    pub fn selected_edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|edge| edge.is_selected())
            .map(|edge| edge.edge_id().clone())
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        self.nodes.iter().any(Node::is_selected) || self.edges.iter().any(Edge::is_selected)
    }

    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.set_selected(false);
        }
        for edge in &mut self.edges {
            edge.set_selected(false);
        }
    }

    /// Removes the given nodes and every edge touching one of them.
    ///
    /// Returns the ids of the edges removed by the cascade, in document order.
    pub fn remove_nodes_cascading(&mut self, node_ids: &BTreeSet<NodeId>) -> Vec<EdgeId> {
        if node_ids.is_empty() {
            return Vec::new();
        }

        self.nodes.retain(|node| !node_ids.contains(node.node_id()));

        let mut removed_edges = Vec::new();
        self.edges.retain(|edge| {
            let dangling = node_ids.contains(edge.source()) || node_ids.contains(edge.target());
            if dangling {
                removed_edges.push(edge.edge_id().clone());
            }
            !dangling
        });
        removed_edges
    }

    /// Drops edges whose endpoints are not in the node list.
    pub fn drop_dangling_edges(&mut self) -> Vec<EdgeId> {
        let node_ids = self
            .nodes
            .iter()
            .map(|node| node.node_id().clone())
            .collect::<BTreeSet<_>>();

        let mut removed = Vec::new();
        self.edges.retain(|edge| {
            let keep = node_ids.contains(edge.source()) && node_ids.contains(edge.target());
            if !keep {
                removed.push(edge.edge_id().clone());
            }
            keep
        });
        removed
    }

    /// Highest numeric suffix among node ids shaped `<prefix><digits>`.
    pub fn highest_node_seq(&self, prefix: &str) -> u64 {
        self.nodes
            .iter()
            .filter_map(|node| node.node_id().seq_suffix(prefix))
            .max()
            .unwrap_or(0)
    }

    /// Highest numeric suffix among edge ids shaped `<prefix><digits>`.
    pub fn highest_edge_seq(&self, prefix: &str) -> u64 {
        self.edges
            .iter()
            .filter_map(|edge| edge.edge_id().seq_suffix(prefix))
            .max()
            .unwrap_or(0)
    }
}
