// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// A `(row, col)` index into a grid.
///
/// Rows run along the real-world length axis, columns along the width axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for CellPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Walkable,
    Obstacle,
}

impl CellState {
    /// Encoding used by the grid storage service (`0` free, `1` obstacle).
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Walkable => 0,
            Self::Obstacle => 1,
        }
    }

    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Walkable),
            1 => Some(Self::Obstacle),
            _ => None,
        }
    }

    pub fn is_obstacle(self) -> bool {
        self == Self::Obstacle
    }
}
