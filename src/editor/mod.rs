// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editing session: one live document, its history, and the persistence gateway.
//!
//! Every historied mutation goes through `commit`, which snapshots the document, applies a
//! batch of ops and records the snapshot only when the batch changed something. Save and load
//! are split into a synchronous `begin_*` step, a detached task that owns everything it needs,
//! and a `finish_*` step, so the session stays editable while a gateway call is pending.

mod events;
mod keyboard;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::format::graph_json::{document_to_value, parse_document_value};
use crate::history::HistoryStack;
use crate::model::{
    EdgeId, GraphDocument, MetadataValue, Node, NodeId, NodeMetadata, Position, Size,
};
use crate::ops::{
    apply_ops, ApplyContext, Delta, EditError, EditOp, MetadataField, NodeStylePatch, ObjectKey,
    ObjectKind,
};
use crate::store::{GatewayError, PersistenceGateway, SavedGraph};

pub use events::{GesturePhase, SelectTarget, SurfaceEvent};
pub use keyboard::{resolve_shortcut, EditorCommand, Key, KeyChord, Modifiers};

const NODE_ID_PREFIX: &str = "";
const EDGE_ID_PREFIX: &str = "e";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing message, e.g. for a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveGesture {
    node_id: NodeId,
    kind: GestureKind,
    recorded: bool,
}

/// A pending save. Owns a serialized copy of the document, so the editor can keep changing.
#[derive(Debug)]
pub struct SaveTask<G> {
    gateway: Arc<G>,
    name: String,
    graph_json: Value,
    version: u32,
}

impl<G: PersistenceGateway> SaveTask<G> {
    pub fn graph_json(&self) -> &Value {
        &self.graph_json
    }

    pub async fn run(self) -> Result<SavedGraph, GatewayError> {
        self.gateway
            .store(&self.name, self.graph_json, self.version)
            .await
    }
}

#[derive(Debug)]
pub struct LoadTask<G> {
    gateway: Arc<G>,
    id: i64,
}

impl<G: PersistenceGateway> LoadTask<G> {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub async fn run(self) -> Result<SavedGraph, GatewayError> {
        self.gateway.fetch_one(self.id).await
    }
}

#[derive(Debug)]
pub struct GraphEditor<G> {
    config: EditorConfig,
    ctx: ApplyContext,
    document: GraphDocument,
    history: HistoryStack<GraphDocument>,
    gateway: Arc<G>,
    rng: StdRng,
    next_node_seq: u64,
    next_edge_seq: u64,
    focused: Option<NodeId>,
    gesture: Option<ActiveGesture>,
    notices: Vec<Notice>,
}

impl<G: PersistenceGateway> GraphEditor<G> {
    pub fn new(gateway: Arc<G>, config: EditorConfig) -> Self {
        Self::with_document(gateway, config, GraphDocument::new())
    }

    /// Starts a session on an existing document. The document is not historied.
    pub fn with_document(gateway: Arc<G>, config: EditorConfig, document: GraphDocument) -> Self {
        let rng = match config.spawn_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut editor = Self {
            ctx: config.apply_context(),
            history: HistoryStack::with_capacity(config.history_capacity),
            config,
            document,
            gateway,
            rng,
            next_node_seq: 1,
            next_edge_seq: 1,
            focused: None,
            gesture: None,
            notices: Vec::new(),
        };
        editor.seed_id_counters();
        editor
    }

    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStack<GraphDocument> {
        &self.history
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The node shown in the property panel, if any.
    pub fn focused_node(&self) -> Option<&Node> {
        self.focused
            .as_ref()
            .and_then(|node_id| self.document.node(node_id))
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    fn seed_id_counters(&mut self) {
        self.next_node_seq = self
            .next_node_seq
            .max(self.document.highest_node_seq(NODE_ID_PREFIX).saturating_add(1));
        self.next_edge_seq = self
            .next_edge_seq
            .max(self.document.highest_edge_seq(EDGE_ID_PREFIX).saturating_add(1));
    }

    /// Next unused id in the numeric sequence. Fails once the sequence tops out at
    /// `u64::MAX` with that id taken; the counter stays put so later calls fail the same way.
    fn allocate_node_id(&mut self) -> Result<NodeId, EditError> {
        loop {
            let seq = self.next_node_seq;
            let node_id = NodeId::from_seq(NODE_ID_PREFIX, seq);
            if !self.document.contains_node(&node_id) {
                self.next_node_seq = seq.saturating_add(1);
                return Ok(node_id);
            }
            self.next_node_seq = seq.checked_add(1).ok_or(EditError::IdSpaceExhausted {
                kind: ObjectKind::Node,
            })?;
        }
    }

    fn allocate_edge_id(&mut self) -> Result<EdgeId, EditError> {
        loop {
            let seq = self.next_edge_seq;
            let edge_id = EdgeId::from_seq(EDGE_ID_PREFIX, seq);
            if self.document.edge(&edge_id).is_none() {
                self.next_edge_seq = seq.saturating_add(1);
                return Ok(edge_id);
            }
            self.next_edge_seq = seq.checked_add(1).ok_or(EditError::IdSpaceExhausted {
                kind: ObjectKind::Edge,
            })?;
        }
    }

    fn reconcile_focus(&mut self) {
        if let Some(node_id) = &self.focused {
            if !self.document.contains_node(node_id) {
                self.focused = None;
            }
        }
    }

    /// Applies `ops` as one user action and records a history entry if anything changed.
    fn commit(&mut self, ops: &[EditOp]) -> Result<Delta, EditError> {
        self.gesture = None;
        let before = self.document.clone();
        let result = apply_ops(&mut self.document, ops, &self.ctx)?;
        if !result.delta.is_empty() {
            self.history.push(before);
            debug!(
                added = result.delta.added.len(),
                removed = result.delta.removed.len(),
                updated = result.delta.updated.len(),
                history = self.history.len(),
                "committed edit"
            );
        }
        self.reconcile_focus();
        Ok(result.delta)
    }

    /// Like `commit`, but consecutive updates of one gesture share a single history entry.
    fn commit_gesture(
        &mut self,
        node_id: &NodeId,
        kind: GestureKind,
        phase: GesturePhase,
        op: EditOp,
    ) -> Result<Delta, EditError> {
        let continues = matches!(
            &self.gesture,
            Some(gesture) if gesture.node_id == *node_id && gesture.kind == kind
        );
        if !continues {
            self.gesture = Some(ActiveGesture {
                node_id: node_id.clone(),
                kind,
                recorded: false,
            });
        }
        let recorded = self.gesture.as_ref().is_some_and(|gesture| gesture.recorded);
        let before = (!recorded).then(|| self.document.clone());

        let result = apply_ops(&mut self.document, std::slice::from_ref(&op), &self.ctx);
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                self.gesture = None;
                return Err(err);
            }
        };

        if let (Some(before), false) = (before, result.delta.is_empty()) {
            self.history.push(before);
            if let Some(gesture) = &mut self.gesture {
                gesture.recorded = true;
            }
            debug!(node_id = %node_id, ?kind, "gesture recorded in history");
        }
        if phase == GesturePhase::Ended {
            self.gesture = None;
        }
        Ok(result.delta)
    }

    /// Appends a node with a fresh id at a random spot inside the spawn area.
    pub fn add_node(&mut self) -> Result<NodeId, EditError> {
        let node_id = self.allocate_node_id()?;
        let extent = self.config.spawn_extent;
        let position = Position::new(
            self.rng.gen::<f64>() * extent,
            self.rng.gen::<f64>() * extent,
        );
        let defaults = &self.config.default_node;
        let size = Size::new(defaults.width, defaults.height);

        let mut node = Node::new(node_id.clone(), position, size);
        node.set_kind(defaults.kind.clone());
        node.set_color(defaults.color.clone());
        let label = node.label().to_owned();
        node.set_metadata(NodeMetadata::new(
            label,
            format!("Description for Node {node_id}"),
            self.ctx.geometry.area_for_size(size),
        ));

        self.commit(&[EditOp::AddNode { node }])?;
        Ok(node_id)
    }

    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, EditError> {
        let edge_id = self.allocate_edge_id()?;
        self.commit(&[EditOp::Connect {
            edge_id: edge_id.clone(),
            source: source.clone(),
            target: target.clone(),
        }])?;
        Ok(edge_id)
    }

    /// Changes the selection. Not historied.
    pub fn select(&mut self, target: SelectTarget, additive: bool) -> Result<(), EditError> {
        match target {
            SelectTarget::Node(node_id) => {
                if !self.document.contains_node(&node_id) {
                    return Err(EditError::NodeNotFound { node_id });
                }
                if !additive {
                    self.document.clear_selection();
                }
                if let Some(node) = self.document.node_mut(&node_id) {
                    node.set_selected(true);
                }
                self.focused = Some(node_id);
            }
            SelectTarget::Edge(edge_id) => {
                if self.document.edge(&edge_id).is_none() {
                    return Err(EditError::EdgeNotFound { edge_id });
                }
                if !additive {
                    self.document.clear_selection();
                    self.focused = None;
                }
                if let Some(edge) = self.document.edge_mut(&edge_id) {
                    edge.set_selected(true);
                }
            }
            SelectTarget::None => {
                self.document.clear_selection();
                self.focused = None;
            }
        }
        Ok(())
    }

    /// Removes the selection, cascading edges. Without a selection this records nothing.
    pub fn delete_selected(&mut self) -> Result<Delta, EditError> {
        if !self.document.has_selection() {
            return Ok(Delta::default());
        }
        self.commit(&[EditOp::RemoveSelected])
    }

    pub fn update_metadata(
        &mut self,
        node_id: &NodeId,
        field: impl Into<MetadataField>,
        value: impl Into<MetadataValue>,
    ) -> Result<Delta, EditError> {
        self.commit(&[EditOp::UpdateMetadata {
            node_id: node_id.clone(),
            field: field.into(),
            value: value.into(),
        }])
    }

    pub fn update_style(
        &mut self,
        node_id: &NodeId,
        patch: NodeStylePatch,
    ) -> Result<Delta, EditError> {
        if patch.is_empty() {
            return Ok(Delta::default());
        }
        self.commit(&[EditOp::UpdateStyle {
            node_id: node_id.clone(),
            patch,
        }])
    }

    pub fn move_node(
        &mut self,
        node_id: &NodeId,
        position: Position,
        phase: GesturePhase,
    ) -> Result<Delta, EditError> {
        let op = EditOp::MoveNode {
            node_id: node_id.clone(),
            position,
        };
        self.commit_gesture(node_id, GestureKind::Move, phase, op)
    }

    pub fn resize_node(
        &mut self,
        node_id: &NodeId,
        size: Size,
        phase: GesturePhase,
    ) -> Result<Delta, EditError> {
        let op = EditOp::ResizeNode {
            node_id: node_id.clone(),
            size,
        };
        self.commit_gesture(node_id, GestureKind::Resize, phase, op)
    }

    pub fn undo(&mut self) -> bool {
        self.gesture = None;
        let stepped = self.history.undo(&mut self.document);
        if stepped {
            self.reconcile_focus();
            debug!(cursor = ?self.history.cursor(), "undo");
        }
        stepped
    }

    pub fn redo(&mut self) -> bool {
        self.gesture = None;
        let stepped = self.history.redo(&mut self.document);
        if stepped {
            self.reconcile_focus();
            debug!(cursor = ?self.history.cursor(), "redo");
        }
        stepped
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) -> Result<Delta, EditError> {
        match event {
            SurfaceEvent::NodeMoved {
                node_id,
                position,
                phase,
            } => self.move_node(&node_id, position, phase),
            SurfaceEvent::NodeResized {
                node_id,
                size,
                phase,
            } => self.resize_node(&node_id, size, phase),
            SurfaceEvent::SelectionChanged { target, additive } => {
                self.select(target, additive)?;
                Ok(Delta::default())
            }
            SurfaceEvent::ConnectionDrawn { source, target } => {
                let edge_id = self.connect(&source, &target)?;
                Ok(Delta {
                    added: vec![ObjectKey::Edge(edge_id)],
                    ..Delta::default()
                })
            }
        }
    }

    /// Runs the command bound to `chord`, if any, and reports which one ran.
    pub fn handle_key(
        &mut self,
        chord: &KeyChord,
        text_focus: bool,
    ) -> Result<Option<EditorCommand>, EditError> {
        let Some(command) = resolve_shortcut(chord, text_focus) else {
            return Ok(None);
        };
        match command {
            EditorCommand::DeleteSelected => {
                self.delete_selected()?;
            }
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
        }
        Ok(Some(command))
    }

    /// Snapshots the document for saving. An empty document is refused with a warning.
    pub fn begin_save(&mut self) -> Option<SaveTask<G>> {
        if self.document.is_empty() {
            warn!("refusing to save an empty map");
            self.notify(
                NoticeLevel::Warning,
                "Nothing to save: add at least one node first.",
            );
            return None;
        }
        Some(SaveTask {
            gateway: Arc::clone(&self.gateway),
            name: self.config.map_name.clone(),
            graph_json: document_to_value(&self.document),
            version: self.config.schema_version,
        })
    }

    pub fn finish_save(
        &mut self,
        outcome: Result<SavedGraph, GatewayError>,
    ) -> Option<SavedGraph> {
        match outcome {
            Ok(record) => {
                info!(id = record.id, name = %record.name, "map saved");
                self.notify(
                    NoticeLevel::Info,
                    format!("Saved map '{}' (id {}).", record.name, record.id),
                );
                Some(record)
            }
            Err(err) => {
                warn!(error = %err, "saving map failed");
                self.notify(NoticeLevel::Error, format!("Failed to save map: {err}"));
                None
            }
        }
    }

    pub async fn save(&mut self) -> Option<SavedGraph> {
        let task = self.begin_save()?;
        let outcome = task.run().await;
        self.finish_save(outcome)
    }

    pub fn begin_load(&self, id: i64) -> LoadTask<G> {
        LoadTask {
            gateway: Arc::clone(&self.gateway),
            id,
        }
    }

    /// Replaces the live document with a fetched record. Historied, so a load can be undone.
    /// On failure the document is left as it was.
    pub fn finish_load(&mut self, outcome: Result<SavedGraph, GatewayError>) -> bool {
        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "loading map failed");
                self.notify(NoticeLevel::Error, format!("Failed to load map: {err}"));
                return false;
            }
        };

        let loaded = parse_document_value(&record.graph_json);
        self.gesture = None;
        let before = std::mem::replace(&mut self.document, loaded);
        self.history.push(before);
        self.focused = None;
        self.seed_id_counters();

        info!(
            id = record.id,
            nodes = self.document.nodes().len(),
            edges = self.document.edges().len(),
            "map loaded"
        );
        self.notify(
            NoticeLevel::Info,
            format!("Loaded map '{}' (id {}).", record.name, record.id),
        );
        true
    }

    pub async fn load(&mut self, id: i64) -> bool {
        let outcome = self.begin_load(id).run().await;
        self.finish_load(outcome)
    }

    /// Saved maps for a load picker, newest first. Failures become an error notice.
    pub async fn saved_graphs(&mut self) -> Vec<SavedGraph> {
        let gateway = Arc::clone(&self.gateway);
        match gateway.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "listing saved maps failed");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to list saved maps: {err}"),
                );
                Vec::new()
            }
        }
    }
}
