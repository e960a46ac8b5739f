// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    edge_id: EdgeId,
    source: NodeId,
    target: NodeId,
    selected: bool,
}

impl Edge {
    pub fn new(edge_id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            edge_id,
            source,
            target,
            selected: false,
        }
    }

    pub fn edge_id(&self) -> &EdgeId {
        &self.edge_id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
