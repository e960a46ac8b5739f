// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor settings, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the stock editor.
//!
//! ```toml
//! map_name = "Ground floor"
//! spawn_seed = 7
//!
//! [geometry]
//! scale = 2.0
//! area_threshold = 25.0
//!
//! [default_node]
//! color = "#FFD700"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::geometry::GeometryRule;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::model::{DEFAULT_NODE_COLOR, DEFAULT_NODE_KIND};
use crate::ops::ApplyContext;
use crate::store::{CURRENT_SCHEMA_VERSION, DEFAULT_MAP_NAME};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub geometry: GeometryRule,
    pub default_node: DefaultNodeConfig,
    /// New nodes land at a random point in `[0, spawn_extent)` on both axes.
    pub spawn_extent: f64,
    /// Fixed RNG seed for reproducible placement; entropy-seeded when absent.
    pub spawn_seed: Option<u64>,
    pub history_capacity: usize,
    pub allow_self_loops: bool,
    pub map_name: String,
    pub schema_version: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryRule::default(),
            default_node: DefaultNodeConfig::default(),
            spawn_extent: 250.0,
            spawn_seed: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            allow_self_loops: true,
            map_name: DEFAULT_MAP_NAME.to_owned(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultNodeConfig {
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub kind: String,
}

impl Default for DefaultNodeConfig {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 150.0,
            color: DEFAULT_NODE_COLOR.to_owned(),
            kind: DEFAULT_NODE_KIND.to_owned(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn apply_context(&self) -> ApplyContext {
        ApplyContext {
            geometry: self.geometry,
            allow_self_loops: self.allow_self_loops,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.geometry.scale) {
            return Err(ConfigError::Invalid {
                field: "geometry.scale",
                reason: "must be a positive number",
            });
        }
        if !self.geometry.area_threshold.is_finite() || self.geometry.area_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "geometry.area_threshold",
                reason: "must be zero or positive",
            });
        }
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.geometry.min_width) || !non_negative(self.geometry.min_height) {
            return Err(ConfigError::Invalid {
                field: "geometry",
                reason: "min_width and min_height must be zero or positive",
            });
        }
        if !positive(self.default_node.width) || !positive(self.default_node.height) {
            return Err(ConfigError::Invalid {
                field: "default_node",
                reason: "width and height must be positive",
            });
        }
        if !self.spawn_extent.is_finite() || self.spawn_extent < 0.0 {
            return Err(ConfigError::Invalid {
                field: "spawn_extent",
                reason: "must be zero or positive",
            });
        }
        if self.map_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "map_name",
                reason: "must not be blank",
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[source] toml::de::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
