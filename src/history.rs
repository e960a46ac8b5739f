// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo log of whole-document snapshots.
//!
//! Entries at or before the cursor are undo states, entries after it are redo states. The
//! caller pushes the pre-mutation state, and every undo/redo swaps the live state with the
//! slot it restores from, so one user action always maps to exactly one entry.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    /// Number of undo states; the cursor index is `undo_len - 1`.
    undo_len: usize,
    capacity: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> HistoryStack<T> {
    /// `capacity` is clamped to at least one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            undo_len: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the entry the next undo restores, or `None` (the `-1` position).
    pub fn cursor(&self) -> Option<usize> {
        self.undo_len.checked_sub(1)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_len > 0
    }

    pub fn can_redo(&self) -> bool {
        self.undo_len < self.entries.len()
    }

    /// Records `snapshot` as the newest undo state, discarding any redo branch.
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.undo_len);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.undo_len = self.entries.len();
    }

    /// Steps back one entry, swapping `current` with the restored state so it becomes the
    /// matching redo state. Returns `false` (leaving `current` untouched) at the oldest entry.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(index) = self.cursor() else {
            return false;
        };
        std::mem::swap(&mut self.entries[index], current);
        self.undo_len = index;
        true
    }

    /// Steps forward one entry, swapping `current` in as the matching undo state.
    pub fn redo(&mut self, current: &mut T) -> bool {
        if !self.can_redo() {
            return false;
        }
        let index = self.undo_len;
        std::mem::swap(&mut self.entries[index], current);
        self.undo_len = index + 1;
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.undo_len = 0;
    }
}
