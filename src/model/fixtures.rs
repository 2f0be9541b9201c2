// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::cell::{CellPos, CellState};
use super::grid::{Grid, GridError, RealExtent};

/// Small warehouse floor: shelving racks in pairs with cross aisles.
pub(crate) fn warehouse() -> Result<Grid, GridError> {
    let mut grid = Grid::new(20, 32, RealExtent::new(16.0, 10.0)?)?;

    for rack_col in (3..29).step_by(5) {
        for row in 2..18 {
            if row == 9 || row == 10 {
                continue;
            }
            grid.set_cell(CellPos::new(row, rack_col), CellState::Obstacle)?;
            grid.set_cell(CellPos::new(row, rack_col + 1), CellState::Obstacle)?;
        }
    }

    Ok(grid)
}

#[cfg(test)]
pub(crate) fn open_grid(rows: usize, columns: usize) -> Grid {
    let extent = RealExtent::new(columns as f64, rows as f64).expect("extent");
    Grid::new(rows, columns, extent).expect("grid")
}

#[cfg(test)]
pub(crate) fn grid_with_wall(rows: usize, columns: usize, wall: &[CellPos]) -> Grid {
    let mut grid = open_grid(rows, columns);
    for &pos in wall {
        grid.set_cell(pos, CellState::Obstacle).expect("wall cell");
    }
    grid
}
