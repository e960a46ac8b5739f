// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Storemap: editing model for node/edge store layout maps.
//!
//! The crate is UI-agnostic. A rendering surface feeds [`editor::SurfaceEvent`]s and key
//! chords into an [`editor::GraphEditor`], reads the live [`model::GraphDocument`] back, and
//! shows the editor's notices. Saved maps go through a [`store::PersistenceGateway`].

pub mod config;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod history;
pub mod model;
pub mod ops;
pub mod store;
