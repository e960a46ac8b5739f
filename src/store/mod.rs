// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for saved maps.
//!
//! The editor talks to a [`PersistenceGateway`]. Two implementations ship with the crate: an
//! in-process table for tests and embedding, and a folder of JSON records used by the CLI.

pub mod gateway;
pub mod memory;
pub mod record_folder;

pub use gateway::{
    GatewayError, PersistenceGateway, SavedGraph, CURRENT_SCHEMA_VERSION, DEFAULT_MAP_NAME,
};
pub use memory::MemoryGateway;
pub use record_folder::{RecordFolder, WriteDurability};
