// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A document holds positioned, sized nodes with editable metadata plus the edges between them.

pub mod document;
pub mod edge;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;

pub use document::GraphDocument;
pub use edge::Edge;
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use node::{
    MetadataValue, Node, NodeMetadata, Position, Size, DEFAULT_NODE_COLOR, DEFAULT_NODE_KIND,
};
