// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell classification and the path overlay.
//!
//! Drawing code asks [`cell_mark`] what a cell shows; the answer combines the grid, the routing
//! points and whatever the [`PathOverlay`] has marked so far.

use serde::Deserialize;

use crate::model::{CellPos, Grid, PointRole, RoutingPoints};

mod overlay;
mod text;

pub use overlay::{partition_batches, PathOverlay};
pub use text::render_grid_text;
pub(crate) use text::truncate_with_ellipsis;

/// How a new path is revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderSpeed {
    /// Every path cell in a single pass.
    Instant,
    /// A fixed-size batch per UI tick.
    #[default]
    Animated,
}

impl RenderSpeed {
    pub fn toggled(self) -> Self {
        match self {
            Self::Instant => Self::Animated,
            Self::Animated => Self::Instant,
        }
    }
}

/// What a single cell displays, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellMark {
    Start,
    End,
    Pickup,
    Path,
    Obstacle,
    Walkable,
}

impl CellMark {
    pub fn glyph(self) -> char {
        match self {
            Self::Start => 'S',
            Self::End => 'E',
            Self::Pickup => 'P',
            Self::Path => '*',
            Self::Obstacle => '#',
            Self::Walkable => '.',
        }
    }
}

pub fn cell_mark(
    grid: &Grid,
    points: &RoutingPoints,
    overlay: &PathOverlay,
    pos: CellPos,
) -> CellMark {
    match points.role_at(pos) {
        Some(PointRole::Start) => CellMark::Start,
        Some(PointRole::End) => CellMark::End,
        Some(PointRole::Pickup) => CellMark::Pickup,
        None if overlay.is_marked(pos) => CellMark::Path,
        None if grid.is_obstacle(pos) => CellMark::Obstacle,
        None => CellMark::Walkable,
    }
}
