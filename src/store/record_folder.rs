// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Saved maps as one JSON record per file.
//!
//! Layout: `<root>/maps/<id>.json`. Ids are allocated as the highest existing id plus one and
//! every record is written through a temp file that is renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::gateway::{
    sort_newest_first, GatewayError, PersistenceGateway, SavedGraph, CURRENT_SCHEMA_VERSION,
    DEFAULT_MAP_NAME,
};

const MAPS_DIRNAME: &str = "maps";
const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also syncs the record and its directory. Exact guarantees depend on the filesystem.
    Durable,
}

#[derive(Debug)]
pub struct RecordFolder {
    root: PathBuf,
    durability: WriteDurability,
    /// Serializes id allocation plus write within this process.
    write_lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedGraphJson {
    id: i64,
    created_at: DateTime<Utc>,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    graph_json: Value,
}

fn default_name() -> String {
    DEFAULT_MAP_NAME.to_owned()
}

fn default_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl From<SavedGraphJson> for SavedGraph {
    fn from(json: SavedGraphJson) -> Self {
        Self {
            id: json.id,
            created_at: json.created_at,
            name: json.name,
            version: json.version,
            graph_json: json.graph_json,
        }
    }
}

impl From<&SavedGraph> for SavedGraphJson {
    fn from(record: &SavedGraph) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            name: record.name.clone(),
            version: record.version,
            graph_json: record.graph_json.clone(),
        }
    }
}

impl RecordFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn maps_dir(&self) -> PathBuf {
        self.root.join(MAPS_DIRNAME)
    }

    pub fn record_path(&self, id: i64) -> PathBuf {
        record_path_in(&self.maps_dir(), id)
    }
}

fn record_path_in(maps_dir: &Path, id: i64) -> PathBuf {
    let mut buf = itoa::Buffer::new();
    maps_dir.join(format!("{}.{RECORD_EXTENSION}", buf.format(id)))
}

fn join_error(err: tokio::task::JoinError) -> GatewayError {
    GatewayError::Unavailable {
        message: format!("record folder task failed: {err}"),
    }
}

#[async_trait]
impl PersistenceGateway for RecordFolder {
    async fn store(
        &self,
        name: &str,
        graph_json: Value,
        version: u32,
    ) -> Result<SavedGraph, GatewayError> {
        let _guard = self.write_lock.lock().await;
        let maps_dir = self.maps_dir();
        let durability = self.durability;
        let name = name.to_owned();

        let record = tokio::task::spawn_blocking(move || {
            store_blocking(&maps_dir, name, graph_json, version, durability)
        })
        .await
        .map_err(join_error)??;

        debug!(id = record.id, path = %self.record_path(record.id).display(), "wrote map record");
        Ok(record)
    }

    async fn fetch_all(&self) -> Result<Vec<SavedGraph>, GatewayError> {
        let maps_dir = self.maps_dir();
        tokio::task::spawn_blocking(move || fetch_all_blocking(&maps_dir))
            .await
            .map_err(join_error)?
    }

    async fn fetch_one(&self, id: i64) -> Result<SavedGraph, GatewayError> {
        let path = self.record_path(id);
        tokio::task::spawn_blocking(move || match read_record(&path) {
            Err(GatewayError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(GatewayError::NotFound { id })
            }
            other => other,
        })
        .await
        .map_err(join_error)?
    }
}

fn store_blocking(
    maps_dir: &Path,
    name: String,
    graph_json: Value,
    version: u32,
    durability: WriteDurability,
) -> Result<SavedGraph, GatewayError> {
    fs::create_dir_all(maps_dir).map_err(|source| GatewayError::Io {
        path: maps_dir.to_path_buf(),
        source,
    })?;

    let id = record_ids(maps_dir)?.into_iter().max().unwrap_or(0) + 1;
    let record = SavedGraph {
        id,
        created_at: Utc::now(),
        name,
        version,
        graph_json,
    };

    let path = record_path_in(maps_dir, id);
    let contents = serde_json::to_vec_pretty(&SavedGraphJson::from(&record)).map_err(|source| {
        GatewayError::Json {
            path: path.clone(),
            source,
        }
    })?;
    write_atomic(&path, &contents, durability)?;
    Ok(record)
}

fn fetch_all_blocking(maps_dir: &Path) -> Result<Vec<SavedGraph>, GatewayError> {
    let mut records = Vec::new();
    for id in record_ids(maps_dir)? {
        match read_record(&record_path_in(maps_dir, id)) {
            Ok(record) => records.push(record),
            Err(err) => warn!(id, error = %err, "skipping unreadable map record"),
        }
    }
    sort_newest_first(&mut records);
    Ok(records)
}

/// Ids of every `<id>.json` entry. A missing folder has no records.
fn record_ids(maps_dir: &Path) -> Result<Vec<i64>, GatewayError> {
    let entries = match fs::read_dir(maps_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(GatewayError::Io {
                path: maps_dir.to_path_buf(),
                source,
            })
        }
    };

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GatewayError::Io {
            path: maps_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
            continue;
        }
        let Some(id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<i64>().ok())
        else {
            continue;
        };
        ids.push(id);
    }
    ids.sort_unstable();
    Ok(ids)
}

fn read_record(path: &Path) -> Result<SavedGraph, GatewayError> {
    let bytes = fs::read(path).map_err(|source| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: SavedGraphJson =
        serde_json::from_slice(&bytes).map_err(|source| GatewayError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(json.into())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), GatewayError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| GatewayError::Io { path, source }
    };

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(GatewayError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("record path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".storemap.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    file.write_all(contents).map_err(io_err(&tmp_path))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_err(&tmp_path))?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(GatewayError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_err(parent))?;
            dir.sync_all().map_err(io_err(parent))?;
        }
    }

    Ok(())
}
