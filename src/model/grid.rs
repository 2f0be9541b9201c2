// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::cell::{CellPos, CellState};

pub const MIN_DIMENSION: usize = 1;
pub const MAX_DIMENSION: usize = 1000;

/// Real-world size of the area covered by a grid, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealExtent {
    width_m: f64,
    length_m: f64,
}

impl RealExtent {
    pub fn new(width_m: f64, length_m: f64) -> Result<Self, GridError> {
        validate_extent("actual_width", width_m)?;
        validate_extent("actual_length", length_m)?;
        Ok(Self { width_m, length_m })
    }

    /// Extent along the column axis.
    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    /// Extent along the row axis.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }
}

fn validate_extent(name: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidExtent { name, value })
    }
}

fn validate_dimension(name: &'static str, value: usize) -> Result<(), GridError> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(GridError::InvalidDimension { name, value, max: MAX_DIMENSION })
    }
}

/// Rectangular obstacle grid.
///
/// Cells are stored row-major in a single buffer, so the matrix stays rectangular for the whole
/// lifetime of the value; changing the shape means building a new `Grid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<CellState>,
    obstacles: usize,
    extent: RealExtent,
    image_id: Option<String>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize, extent: RealExtent) -> Result<Self, GridError> {
        validate_dimension("rows", rows)?;
        validate_dimension("columns", columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![CellState::Walkable; rows * columns],
            obstacles: 0,
            extent,
            image_id: None,
        })
    }

    /// Builds a grid from the storage service's `0`/`1` matrix.
    pub fn from_matrix(
        matrix: &[Vec<u8>],
        extent: RealExtent,
        image_id: Option<String>,
    ) -> Result<Self, GridError> {
        let rows = matrix.len();
        validate_dimension("rows", rows)?;
        let columns = matrix[0].len();
        validate_dimension("columns", columns)?;

        let mut grid = Self::new(rows, columns, extent)?;
        for (row, values) in matrix.iter().enumerate() {
            if values.len() != columns {
                return Err(GridError::RaggedMatrix { row, expected: columns, found: values.len() });
            }
            for (col, &value) in values.iter().enumerate() {
                let pos = CellPos::new(row, col);
                let state = CellState::from_wire(value)
                    .ok_or(GridError::InvalidCellValue { pos, value })?;
                grid.cells[row * columns + col] = state;
                if state.is_obstacle() {
                    grid.obstacles += 1;
                }
            }
        }
        grid.image_id = image_id;
        Ok(grid)
    }

    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().map(|cell| cell.wire_value()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn extent(&self) -> RealExtent {
        self.extent
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    pub fn set_image_id(&mut self, image_id: Option<String>) {
        self.image_id = image_id;
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }

    fn index_of(&self, pos: CellPos) -> Result<usize, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds { pos, rows: self.rows, columns: self.columns });
        }
        Ok(pos.row * self.columns + pos.col)
    }

    pub fn cell(&self, pos: CellPos) -> Result<CellState, GridError> {
        let idx = self.index_of(pos)?;
        Ok(self.cells[idx])
    }

    pub fn is_obstacle(&self, pos: CellPos) -> bool {
        self.cell(pos).is_ok_and(CellState::is_obstacle)
    }

    /// Writes `state` at `pos` and reports whether the cell changed.
    pub fn set_cell(&mut self, pos: CellPos, state: CellState) -> Result<bool, GridError> {
        let idx = self.index_of(pos)?;
        let previous = std::mem::replace(&mut self.cells[idx], state);
        if previous == state {
            return Ok(false);
        }
        if state.is_obstacle() {
            self.obstacles += 1;
        } else {
            self.obstacles -= 1;
        }
        Ok(true)
    }

    /// Resets every cell to walkable and returns how many cells changed.
    pub fn clear_all(&mut self) -> usize {
        let changed = self.obstacles;
        self.cells.fill(CellState::Walkable);
        self.obstacles = 0;
        changed
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.len() - self.obstacles
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn obstacle_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_obstacle())
            .map(move |(idx, _)| CellPos::new(idx / columns, idx % columns))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    InvalidDimension { name: &'static str, value: usize, max: usize },
    InvalidExtent { name: &'static str, value: f64 },
    OutOfBounds { pos: CellPos, rows: usize, columns: usize },
    RaggedMatrix { row: usize, expected: usize, found: usize },
    InvalidCellValue { pos: CellPos, value: u8 },
    ShapeMismatch { declared: (usize, usize), found: (usize, usize) },
}

impl GridError {
    /// Bounds errors come from mis-wired input handling rather than from user input.
    pub fn is_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { name, value, max } => {
                write!(f, "{name} must be between {MIN_DIMENSION} and {max} (got {value})")
            }
            Self::InvalidExtent { name, value } => {
                write!(f, "{name} must be a positive number of meters (got {value})")
            }
            Self::OutOfBounds { pos, rows, columns } => {
                write!(f, "cell {pos} is outside the {rows}x{columns} grid")
            }
            Self::RaggedMatrix { row, expected, found } => {
                write!(f, "grid row {row} has {found} cells, expected {expected}")
            }
            Self::InvalidCellValue { pos, value } => {
                write!(f, "grid cell {pos} has value {value}, expected 0 (free) or 1 (obstacle)")
            }
            Self::ShapeMismatch { declared, found } => write!(
                f,
                "grid declares {}x{} cells but its matrix is {}x{}",
                declared.0, declared.1, found.0, found.1
            ),
        }
    }
}

impl std::error::Error for GridError {}
