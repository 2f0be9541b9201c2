// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use crate::model::{CellPos, CellState};

/// One pointer-down .. pointer-up paint stroke.
///
/// The paint state is captured at pointer-down so a mode switch mid-stroke does not change what
/// the stroke paints. Every cell is offered to the grid at most once per stroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    paint: CellState,
    last_processed: CellPos,
    visited: HashSet<CellPos>,
    changed: usize,
}

impl DragGesture {
    pub fn begin(paint: CellState, pos: CellPos) -> Self {
        let mut visited = HashSet::new();
        visited.insert(pos);
        Self { paint, last_processed: pos, visited, changed: 0 }
    }

    pub fn paint(&self) -> CellState {
        self.paint
    }

    pub fn last_processed(&self) -> CellPos {
        self.last_processed
    }

    /// Returns `true` when `pos` is new to this stroke and should be painted.
    pub fn enter(&mut self, pos: CellPos) -> bool {
        if pos == self.last_processed || !self.visited.insert(pos) {
            return false;
        }
        self.last_processed = pos;
        true
    }

    pub fn record_change(&mut self) {
        self.changed += 1;
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Cells whose state actually changed during the stroke.
    pub fn changed_count(&self) -> usize {
        self.changed
    }
}
