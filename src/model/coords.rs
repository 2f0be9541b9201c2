// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Grid index to real-world coordinate conversions.
//!
//! Columns map to the x (width) axis and rows to the y (length) axis. The pathfinding service
//! relies on the same convention, so it must not be swapped.

use super::cell::CellPos;
use super::grid::Grid;

/// Stateless mapper built from a grid's shape and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    rows: usize,
    columns: usize,
    cell_width_m: f64,
    cell_length_m: f64,
}

impl CoordinateMapper {
    pub fn for_grid(grid: &Grid) -> Self {
        let extent = grid.extent();
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cell_width_m: extent.width_m() / grid.columns() as f64,
            cell_length_m: extent.length_m() / grid.rows() as f64,
        }
    }

    /// Per-axis cell size in meters: `(width, length)`. Cells need not be square in meters.
    pub fn cell_size_real(&self) -> (f64, f64) {
        (self.cell_width_m, self.cell_length_m)
    }

    pub fn cell_to_real(&self, pos: CellPos) -> (f64, f64) {
        (pos.col as f64 * self.cell_width_m, pos.row as f64 * self.cell_length_m)
    }

    /// Sum of straight-line distances between consecutive cells, in meters.
    pub fn real_distance(&self, cells: &[CellPos]) -> f64 {
        cells
            .windows(2)
            .map(|pair| {
                let (x0, y0) = self.cell_to_real(pair[0]);
                let (x1, y1) = self.cell_to_real(pair[1]);
                (x1 - x0).hypot(y1 - y0)
            })
            .sum()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::CoordinateMapper;
    use crate::model::{CellPos, Grid, RealExtent};

    fn mapper(rows: usize, columns: usize, width_m: f64, length_m: f64) -> CoordinateMapper {
        let extent = RealExtent::new(width_m, length_m).expect("extent");
        CoordinateMapper::for_grid(&Grid::new(rows, columns, extent).expect("grid"))
    }

    #[rstest]
    #[case(1, 1, 3.0, 4.0)]
    #[case(10, 20, 20.0, 5.0)]
    #[case(1000, 7, 0.5, 900.0)]
    fn origin_maps_to_zero_and_far_corner_stays_inside(
        #[case] rows: usize,
        #[case] columns: usize,
        #[case] width_m: f64,
        #[case] length_m: f64,
    ) {
        let mapper = mapper(rows, columns, width_m, length_m);
        assert_eq!(mapper.cell_to_real(CellPos::new(0, 0)), (0.0, 0.0));

        let (cell_w, cell_l) = mapper.cell_size_real();
        let (x, y) = mapper.cell_to_real(CellPos::new(rows - 1, columns - 1));
        assert!((x - (width_m - cell_w)).abs() < 1e-9);
        assert!((y - (length_m - cell_l)).abs() < 1e-9);
        assert!(x < width_m && y < length_m);
    }

    #[test]
    fn columns_map_to_width_and_rows_to_length() {
        let mapper = mapper(4, 10, 20.0, 8.0);
        assert_eq!(mapper.cell_size_real(), (2.0, 2.0));
        assert_eq!(mapper.cell_to_real(CellPos::new(1, 3)), (6.0, 2.0));
    }

    #[test]
    fn real_distance_uses_per_axis_cell_size() {
        // 1 m wide cells, 3 m long cells.
        let mapper = mapper(2, 4, 4.0, 6.0);
        let horizontal = [CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(0, 2)];
        assert!((mapper.real_distance(&horizontal) - 2.0).abs() < 1e-9);

        let vertical = [CellPos::new(0, 0), CellPos::new(1, 0)];
        assert!((mapper.real_distance(&vertical) - 3.0).abs() < 1e-9);

        let diagonal = [CellPos::new(0, 0), CellPos::new(1, 1)];
        assert!((mapper.real_distance(&diagonal) - 10f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn real_distance_of_trivial_paths_is_zero() {
        let mapper = mapper(3, 3, 3.0, 3.0);
        assert_eq!(mapper.real_distance(&[]), 0.0);
        assert_eq!(mapper.real_distance(&[CellPos::new(1, 1)]), 0.0);
    }
}
