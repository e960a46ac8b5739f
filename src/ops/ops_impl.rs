// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Node/edge mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(
    document: &mut GraphDocument,
    op: &EditOp,
    ctx: &ApplyContext,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    match op {
        EditOp::AddNode { node } => {
            if document.contains_node(node.node_id()) {
                return Err(EditError::AlreadyExists {
                    kind: ObjectKind::Node,
                    id: node.node_id().to_string(),
                });
            }
            validate_size(node.size())?;
            validate_position(node.position())?;
            document.nodes_mut().push(node.clone());
            delta.record_added(ObjectKey::Node(node.node_id().clone()));
            Ok(())
        }
        EditOp::Connect {
            edge_id,
            source,
            target,
        } => {
            if document.edge(edge_id).is_some() {
                return Err(EditError::AlreadyExists {
                    kind: ObjectKind::Edge,
                    id: edge_id.to_string(),
                });
            }
            require_node(document, source)?;
            require_node(document, target)?;
            if source == target && !ctx.allow_self_loops {
                return Err(EditError::SelfLoopRejected {
                    node_id: source.clone(),
                });
            }
            document
                .edges_mut()
                .push(Edge::new(edge_id.clone(), source.clone(), target.clone()));
            delta.record_added(ObjectKey::Edge(edge_id.clone()));
            Ok(())
        }
        EditOp::RemoveNode { node_id } => {
            require_node(document, node_id)?;
            let removed_edges = document.remove_nodes_cascading(&BTreeSet::from([node_id.clone()]));
            for edge_id in removed_edges {
                delta.record_removed(ObjectKey::Edge(edge_id));
            }
            delta.record_removed(ObjectKey::Node(node_id.clone()));
            Ok(())
        }
        EditOp::RemoveEdge { edge_id } => {
            let before_len = document.edges().len();
            document.edges_mut().retain(|edge| edge.edge_id() != edge_id);
            if document.edges().len() == before_len {
                return Err(EditError::EdgeNotFound {
                    edge_id: edge_id.clone(),
                });
            }
            delta.record_removed(ObjectKey::Edge(edge_id.clone()));
            Ok(())
        }
        EditOp::RemoveSelected => {
            let selected_nodes = document
                .selected_node_ids()
                .into_iter()
                .collect::<BTreeSet<_>>();
            let selected_edges = document.selected_edge_ids();

            document.edges_mut().retain(|edge| !edge.is_selected());
            for edge_id in selected_edges {
                delta.record_removed(ObjectKey::Edge(edge_id));
            }

            for edge_id in document.remove_nodes_cascading(&selected_nodes) {
                delta.record_removed(ObjectKey::Edge(edge_id));
            }
            for node_id in selected_nodes {
                delta.record_removed(ObjectKey::Node(node_id));
            }
            Ok(())
        }
        EditOp::MoveNode { node_id, position } => {
            validate_position(*position)?;
            let node = require_node_mut(document, node_id)?;
            if node.position() != *position {
                node.set_position(*position);
                delta.record_updated(ObjectKey::Node(node_id.clone()));
            }
            Ok(())
        }
        EditOp::ResizeNode { node_id, size } => {
            validate_size(*size)?;
            let node = require_node_mut(document, node_id)?;
            if ctx.geometry.apply_resize(node, *size).any() {
                delta.record_updated(ObjectKey::Node(node_id.clone()));
            }
            Ok(())
        }
        EditOp::UpdateMetadata {
            node_id,
            field,
            value,
        } => {
            let node = require_node_mut(document, node_id)?;
            let changed = apply_metadata_field(node, field, value, &ctx.geometry)?;
            if changed {
                delta.record_updated(ObjectKey::Node(node_id.clone()));
            }
            Ok(())
        }
        EditOp::UpdateStyle { node_id, patch } => {
            let node = require_node_mut(document, node_id)?;
            let mut changed = false;

            if patch.width.is_some() || patch.height.is_some() {
                let current = node.size();
                let size = Size::new(
                    patch.width.unwrap_or(current.width),
                    patch.height.unwrap_or(current.height),
                );
                validate_size(size)?;
                changed |= ctx.geometry.apply_resize(node, size).any();
            }
            if let Some(color) = &patch.color {
                if node.color() != color {
                    node.set_color(color.clone());
                    changed = true;
                }
            }
            if let Some(label) = &patch.label {
                if node.label() != label {
                    node.set_label(label.clone());
                    changed = true;
                }
            }

            if changed {
                delta.record_updated(ObjectKey::Node(node_id.clone()));
            }
            Ok(())
        }
    }
}

fn apply_metadata_field(
    node: &mut Node,
    field: &MetadataField,
    value: &MetadataValue,
    geometry: &GeometryRule,
) -> Result<bool, EditError> {
    match field {
        MetadataField::Name => {
            let name = value.clone().into_text();
            let changed = node.metadata().name() != name;
            node.metadata_mut().set_name(name);
            Ok(changed)
        }
        MetadataField::Description => {
            let description = value.clone().into_text();
            let changed = node.metadata().description() != description;
            node.metadata_mut().set_description(description);
            Ok(changed)
        }
        MetadataField::Area => {
            let Some(area) = value.as_number() else {
                return Err(EditError::InvalidMetadata {
                    field: field.clone(),
                    reason: "area must be a number",
                });
            };
            if !area.is_finite() || area < 0.0 {
                return Err(EditError::InvalidMetadata {
                    field: field.clone(),
                    reason: "area must be a non-negative finite number",
                });
            }
            Ok(geometry.apply_area(node, area).any())
        }
        MetadataField::Extra(key) => {
            // Reserved keys always go to their typed field; an extra under the same name
            // would shadow it in the stored shape.
            let typed = MetadataField::from(key.as_str());
            if !matches!(typed, MetadataField::Extra(_)) {
                return apply_metadata_field(node, &typed, value, geometry);
            }
            if matches!(value, MetadataValue::Number(number) if !number.is_finite()) {
                return Err(EditError::InvalidMetadata {
                    field: field.clone(),
                    reason: "numbers must be finite",
                });
            }
            let previous = node.metadata_mut().extra_mut().insert(key.clone(), value.clone());
            Ok(previous.as_ref() != Some(value))
        }
    }
}

fn validate_size(size: Size) -> Result<(), EditError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(size.width) && valid(size.height) {
        Ok(())
    } else {
        Err(EditError::InvalidSize {
            width: size.width,
            height: size.height,
        })
    }
}

fn validate_position(position: Position) -> Result<(), EditError> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(())
    } else {
        Err(EditError::InvalidPosition {
            x: position.x,
            y: position.y,
        })
    }
}

fn require_node(document: &GraphDocument, node_id: &NodeId) -> Result<(), EditError> {
    if document.contains_node(node_id) {
        Ok(())
    } else {
        Err(EditError::NodeNotFound {
            node_id: node_id.clone(),
        })
    }
}

fn require_node_mut<'a>(
    document: &'a mut GraphDocument,
    node_id: &NodeId,
) -> Result<&'a mut Node, EditError> {
    document
        .node_mut(node_id)
        .ok_or_else(|| EditError::NodeNotFound {
            node_id: node_id.clone(),
        })
}
