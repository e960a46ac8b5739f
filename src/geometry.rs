// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keeps a node's visual size and its `area` metadata in step.
//!
//! Each call takes exactly one authoritative input (a new size, or a new area) and derives
//! the other side in the same step. Nothing here re-enters itself from its own output, so a
//! resize never bounces back into a size recompute.

use serde::Deserialize;

use crate::model::{Node, Size};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryRule {
    /// Visual units per area unit along one axis; area is divided by `scale^2`.
    pub scale: f64,
    /// An area edit only resizes the node when it differs from the current size by more
    /// than this many square units. `0.0` resizes on every change.
    pub area_threshold: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for GeometryRule {
    fn default() -> Self {
        Self {
            scale: 1.0,
            area_threshold: 500.0,
            min_width: 50.0,
            min_height: 50.0,
        }
    }
}

/// What a single reducer step changed on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryChange {
    pub size_changed: bool,
    pub area_changed: bool,
}

impl GeometryChange {
    pub fn any(&self) -> bool {
        self.size_changed || self.area_changed
    }
}

impl GeometryRule {
    fn scale_sq(&self) -> f64 {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        scale * scale
    }

    fn effective_scale(&self) -> f64 {
        self.scale_sq().sqrt()
    }

    /// Area implied by a visual size.
    pub fn area_for_size(&self, size: Size) -> f64 {
        size.area() / self.scale_sq()
    }

    /// Size implied by an area while holding `current`'s aspect ratio.
    pub fn size_for_area(&self, area: f64, current: Size) -> Size {
        let aspect = current.aspect_ratio();
        let width = (area * aspect).sqrt() * self.effective_scale();
        Size::new(width, width / aspect)
    }

    /// Clamps a manipulated size to the configured minimum.
    pub fn clamp_size(&self, size: Size) -> Size {
        Size::new(size.width.max(self.min_width), size.height.max(self.min_height))
    }

    /// Size is authoritative: store it (clamped) and derive `area` from it.
    pub fn apply_resize(&self, node: &mut Node, size: Size) -> GeometryChange {
        let size = self.clamp_size(size);
        let mut change = GeometryChange::default();

        if node.size() != size {
            node.set_size(size);
            change.size_changed = true;
        }

        let area = self.area_for_size(size);
        if node.metadata().area() != area {
            node.metadata_mut().set_area(area);
            change.area_changed = true;
        }
        change
    }

    /// Area is authoritative: store it and resize only when the current size disagrees by
    /// more than the threshold.
    pub fn apply_area(&self, node: &mut Node, area: f64) -> GeometryChange {
        let mut change = GeometryChange::default();

        if node.metadata().area() != area {
            node.metadata_mut().set_area(area);
            change.area_changed = true;
        }

        if area <= 0.0 {
            return change;
        }

        let current = node.size();
        let implied = self.area_for_size(current);
        if (area - implied).abs() <= self.area_threshold {
            return change;
        }

        let size = self.size_for_area(area, current);
        if size != current {
            node.set_size(size);
            change.size_changed = true;
        }
        change
    }
}
