// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process saved-map table.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::gateway::{sort_newest_first, GatewayError, PersistenceGateway, SavedGraph};

#[derive(Debug, Default)]
struct Table {
    records: Vec<SavedGraph>,
    next_id: i64,
    unavailable: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    table: Mutex<Table>,
    store_calls: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with [`GatewayError::Unavailable`] until cleared with
    /// `None`.
    pub async fn set_unavailable(&self, message: Option<String>) {
        self.table.lock().await.unavailable = message;
    }

    /// Number of `store` calls received, failed ones included.
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn check_available(table: &Table) -> Result<(), GatewayError> {
    match &table.unavailable {
        Some(message) => Err(GatewayError::Unavailable {
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn store(
        &self,
        name: &str,
        graph_json: Value,
        version: u32,
    ) -> Result<SavedGraph, GatewayError> {
        self.store_calls.fetch_add(1, Ordering::Relaxed);
        let mut table = self.table.lock().await;
        check_available(&table)?;

        table.next_id += 1;
        let record = SavedGraph {
            id: table.next_id,
            created_at: Utc::now(),
            name: name.to_owned(),
            version,
            graph_json,
        };
        table.records.push(record.clone());
        debug!(id = record.id, name, "stored map in memory table");
        Ok(record)
    }

    async fn fetch_all(&self) -> Result<Vec<SavedGraph>, GatewayError> {
        let table = self.table.lock().await;
        check_available(&table)?;
        let mut records = table.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn fetch_one(&self, id: i64) -> Result<SavedGraph, GatewayError> {
        let table = self.table.lock().await;
        check_available(&table)?;
        table
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::MemoryGateway;
    use crate::store::{GatewayError, PersistenceGateway};

    #[tokio::test]
    async fn store_assigns_increasing_ids() {
        let gateway = MemoryGateway::new();
        let first = gateway.store("A", json!({}), 1).await.expect("store");
        let second = gateway.store("B", json!({}), 1).await.expect("store");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(gateway.store_calls(), 2);
    }

    #[tokio::test]
    async fn fetch_all_lists_newest_first() {
        let gateway = MemoryGateway::new();
        for name in ["first", "second", "third"] {
            gateway.store(name, json!({}), 1).await.expect("store");
        }

        let names = gateway
            .fetch_all()
            .await
            .expect("fetch")
            .into_iter()
            .map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn fetch_one_reports_missing_id() {
        let gateway = MemoryGateway::new();
        let err = gateway.fetch_one(7).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { id: 7 }));
    }

    #[tokio::test]
    async fn unavailable_table_fails_every_call() {
        let gateway = MemoryGateway::new();
        gateway.set_unavailable(Some("offline".to_owned())).await;

        assert!(matches!(
            gateway.store("A", json!({}), 1).await,
            Err(GatewayError::Unavailable { .. })
        ));
        assert!(gateway.fetch_all().await.is_err());
        assert_eq!(gateway.store_calls(), 1);
        assert!(gateway.is_empty().await);

        gateway.set_unavailable(None).await;
        gateway.store("A", json!({}), 1).await.expect("store");
        assert_eq!(gateway.len().await, 1);
    }
}
