// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub const DEFAULT_MAP_NAME: &str = "MyCustomMap";
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// One saved map. Records are insert-only; every save produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGraph {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub version: u32,
    /// Either the structured document or a JSON string holding it.
    pub graph_json: Value,
}

/// The hosted table behind save/load.
///
/// Implementations must be shareable across tasks; the editor keeps one behind an `Arc` and
/// never holds a borrow of itself while a call is pending.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn store(
        &self,
        name: &str,
        graph_json: Value,
        version: u32,
    ) -> Result<SavedGraph, GatewayError>;

    /// All records, newest first (`created_at` descending, then `id` descending).
    async fn fetch_all(&self) -> Result<Vec<SavedGraph>, GatewayError>;

    async fn fetch_one(&self, id: i64) -> Result<SavedGraph, GatewayError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn store(
        &self,
        name: &str,
        graph_json: Value,
        version: u32,
    ) -> Result<SavedGraph, GatewayError> {
        (**self).store(name, graph_json, version).await
    }

    async fn fetch_all(&self) -> Result<Vec<SavedGraph>, GatewayError> {
        (**self).fetch_all().await
    }

    async fn fetch_one(&self, id: i64) -> Result<SavedGraph, GatewayError> {
        (**self).fetch_one(id).await
    }
}

pub(crate) fn sort_newest_first(records: &mut [SavedGraph]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("saved map not found (id={id})")]
    NotFound { id: i64 },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("persistence unavailable: {message}")]
    Unavailable { message: String },
}
