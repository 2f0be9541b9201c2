// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashSet, VecDeque};

use super::RenderSpeed;
use crate::config::RenderConfig;
use crate::model::{CellPos, Path, RoutingPoints};
use crate::ops::{Editor, EditorEvent};

/// Splits the markable cells of a path into ordered batches.
///
/// Cells for which `protected` returns `true` are dropped before batching.
pub fn partition_batches(
    cells: &[CellPos],
    protected: impl Fn(CellPos) -> bool,
    batch_size: usize,
) -> Vec<Vec<CellPos>> {
    let markable = cells.iter().copied().filter(|&pos| !protected(pos)).collect::<Vec<_>>();
    markable.chunks(batch_size.max(1)).map(<[CellPos]>::to_vec).collect()
}

/// Path cells currently shown on the grid plus the batches still waiting to be shown.
#[derive(Debug, Clone)]
pub struct PathOverlay {
    batch_size: usize,
    speed: RenderSpeed,
    marked: HashSet<CellPos>,
    pending: VecDeque<Vec<CellPos>>,
}

impl PathOverlay {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            speed: config.speed,
            marked: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn speed(&self) -> RenderSpeed {
        self.speed
    }

    /// Speed used for paths arriving through editor events.
    pub fn set_speed(&mut self, speed: RenderSpeed) {
        self.speed = speed;
    }

    pub fn is_marked(&self, pos: CellPos) -> bool {
        self.marked.contains(&pos)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    /// Replaces whatever is shown with `path`. Returns the number of cells marked right away.
    pub fn display(&mut self, path: &Path, points: &RoutingPoints, speed: RenderSpeed) -> usize {
        self.clear();
        let batches = partition_batches(path.cells(), |pos| points.contains(pos), self.batch_size);
        tracing::debug!(cells = path.len(), batches = batches.len(), ?speed, "displaying path");
        match speed {
            RenderSpeed::Instant => batches.into_iter().flatten().map(|pos| self.mark(pos)).sum(),
            RenderSpeed::Animated => {
                self.pending = batches.into();
                0
            }
        }
    }

    fn mark(&mut self, pos: CellPos) -> usize {
        usize::from(self.marked.insert(pos))
    }

    /// Marks the next pending batch. Returns `None` once nothing is pending.
    pub fn tick(&mut self) -> Option<usize> {
        let batch = self.pending.pop_front()?;
        Some(batch.into_iter().map(|pos| self.mark(pos)).sum())
    }

    /// Marks every pending batch at once.
    pub fn finish(&mut self) -> usize {
        let mut marked = 0;
        while let Some(count) = self.tick() {
            marked += count;
        }
        marked
    }

    /// Unmarks everything and cancels pending batches. Returns the number of cells unmarked.
    pub fn clear(&mut self) -> usize {
        self.pending.clear();
        let cleared = self.marked.len();
        self.marked.clear();
        cleared
    }

    pub fn on_editor_event(&mut self, event: &EditorEvent, editor: &Editor) {
        match event {
            EditorEvent::PathCleared | EditorEvent::GridReplaced { .. } => {
                self.clear();
            }
            EditorEvent::PathReplaced => match editor.path() {
                Some(path) => {
                    self.display(path, editor.points(), self.speed);
                }
                None => {
                    self.clear();
                }
            },
            EditorEvent::CellsChanged(_)
            | EditorEvent::PointsChanged
            | EditorEvent::ModeChanged(_) => {}
        }
    }
}
