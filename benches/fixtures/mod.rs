// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use floorgrid::model::{CellPos, CellState, Grid, RealExtent, RoutingPoints};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn side(self) -> usize {
        match self {
            Self::Small => 50,
            Self::Medium => 250,
            Self::Large => 1000,
        }
    }
}

/// Square warehouse: rack pairs every six columns with a cross aisle every twenty rows.
pub fn warehouse(case: Case) -> Grid {
    let side = case.side();
    let extent = RealExtent::new(side as f64 * 0.5, side as f64 * 0.5).expect("extent");
    let mut grid = Grid::new(side, side, extent).expect("grid");
    for col in (2..side.saturating_sub(2)).step_by(6) {
        for row in 1..side - 1 {
            if row % 20 == 0 {
                continue;
            }
            grid.set_cell(CellPos::new(row, col), CellState::Obstacle).expect("rack");
            grid.set_cell(CellPos::new(row, col + 1), CellState::Obstacle).expect("rack");
        }
    }
    grid
}

/// Serpentine route through the aisles of [`warehouse`], one cell per step.
pub fn serpentine_path(case: Case) -> Vec<CellPos> {
    let side = case.side();
    let mut cells = Vec::new();
    for row in (0..side).step_by(20) {
        let cols: Box<dyn Iterator<Item = usize>> =
            if (row / 20) % 2 == 0 { Box::new(0..side) } else { Box::new((0..side).rev()) };
        cells.extend(cols.map(|col| CellPos::new(row, col)));
    }
    cells
}

pub fn route_points(path: &[CellPos]) -> RoutingPoints {
    let mut points = RoutingPoints::default();
    if let (Some(&first), Some(&last)) = (path.first(), path.last()) {
        points.set_start(first);
        points.set_end(last);
    }
    for pos in path.iter().step_by(97).skip(1) {
        points.toggle_pickup(*pos);
    }
    points
}

/// Horizontal drag across every column of `row`.
pub fn stroke(case: Case, row: usize) -> Vec<CellPos> {
    (0..case.side()).map(|col| CellPos::new(row, col)).collect()
}
