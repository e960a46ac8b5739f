// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{EdgeId, NodeId, Position, Size};

/// Where a drag or resize gesture is. One gesture becomes one history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Intermediate update; the first one of a gesture records history.
    InProgress,
    /// Final update. Records history only if no `InProgress` update came first.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    Node(NodeId),
    Edge(EdgeId),
    /// Click on empty canvas.
    None,
}

/// Raw interaction events from the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    NodeMoved {
        node_id: NodeId,
        position: Position,
        phase: GesturePhase,
    },
    NodeResized {
        node_id: NodeId,
        size: Size,
        phase: GesturePhase,
    },
    SelectionChanged {
        target: SelectTarget,
        additive: bool,
    },
    ConnectionDrawn {
        source: NodeId,
        target: NodeId,
    },
}
