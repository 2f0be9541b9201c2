// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive editing session.
//!
//! [`Editor`] owns the grid, routing points and the current path. Pointer input and commands
//! mutate it synchronously; every mutation queues [`EditorEvent`]s that the rendering side drains
//! to refresh derived state (overlay, layout, status line).

use std::fmt;

use crate::config::EditorConfig;
use crate::model::{
    CellPos, CellState, CoordinateMapper, Grid, GridError, Path, PathMetrics, PickupToggle,
    PointRole, RealExtent, RoutingPoints,
};

mod drag;
mod product;

pub use drag::DragGesture;
pub use product::{ProductDraft, ProductError, ProductPlacement};

use crate::service::GridDocument;

/// Algorithm requested when the user does not pick one.
pub const DEFAULT_ALGORITHM: &str = "optimal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EditMode {
    #[default]
    None,
    SetStart,
    SetEnd,
    SetPickup,
    PaintObstacle,
    PaintClear,
}

impl EditMode {
    pub fn paint_state(self) -> Option<CellState> {
        match self {
            Self::PaintObstacle => Some(CellState::Obstacle),
            Self::PaintClear => Some(CellState::Walkable),
            _ => None,
        }
    }

    pub fn point_role(self) -> Option<PointRole> {
        match self {
            Self::SetStart => Some(PointRole::Start),
            Self::SetEnd => Some(PointRole::End),
            Self::SetPickup => Some(PointRole::Pickup),
            _ => None,
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "view",
            Self::SetStart => "set start",
            Self::SetEnd => "set end",
            Self::SetPickup => "pickups",
            Self::PaintObstacle => "paint obstacles",
            Self::PaintClear => "erase obstacles",
        };
        f.write_str(label)
    }
}

/// Where requested grid dimensions came from; manual entry has a tighter limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSource {
    Manual,
    Suggested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    CellsChanged(Vec<CellPos>),
    PointsChanged,
    PathReplaced,
    PathCleared,
    GridReplaced { rows: usize, columns: usize },
    ModeChanged(EditMode),
}

/// Everything the pathfinding service needs, taken from a consistent editor snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub grid_id: String,
    pub start: CellPos,
    pub end: CellPos,
    pub pickups: Vec<CellPos>,
    pub algorithm: String,
    /// [`Editor::route_epoch`] at the time of the request.
    pub route_epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorStats {
    pub rows: usize,
    pub columns: usize,
    pub obstacles: usize,
    pub walkable: usize,
    pub pickups: usize,
    pub has_start: bool,
    pub has_end: bool,
    pub path_cells: usize,
    /// Length of the current path in meters, from the grid's real extent.
    pub path_distance_m: f64,
    pub saved: bool,
    pub dirty: bool,
}

/// Checks user-typed dimensions against the manual entry limit.
pub fn validate_manual_dimensions(
    rows: usize,
    columns: usize,
    max: usize,
) -> Result<(), ValidationError> {
    for (name, value) in [("rows", rows), ("columns", columns)] {
        if value == 0 || value > max {
            return Err(ValidationError::ManualDimension { name, value, max });
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    grid: Grid,
    points: RoutingPoints,
    path: Option<Path>,
    mode: EditMode,
    drag: Option<DragGesture>,
    grid_id: Option<String>,
    dirty: bool,
    generation: u64,
    route_epoch: u64,
    events: Vec<EditorEvent>,
}

impl Editor {
    pub fn new(config: EditorConfig, grid: Grid) -> Self {
        Self {
            config,
            grid,
            points: RoutingPoints::default(),
            path: None,
            mode: EditMode::None,
            drag: None,
            grid_id: None,
            dirty: false,
            generation: 0,
            route_epoch: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn points(&self) -> &RoutingPoints {
        &self.points
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn grid_id(&self) -> Option<&str> {
        self.grid_id.as_deref()
    }

    /// Grid content changed since it was last saved or loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The grid must be stored before the service can route on it.
    pub fn needs_save(&self) -> bool {
        self.grid_id.is_none() || self.dirty
    }

    /// Bumped whenever the grid is replaced; async replies carry it to detect staleness.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped whenever routing points or obstacles change, so a path computed for an older
    /// layout can be told apart from one for the current state.
    pub fn route_epoch(&self) -> u64 {
        self.route_epoch
    }

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_mode(&mut self, mode: EditMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.events.push(EditorEvent::ModeChanged(mode));
        true
    }

    pub fn clear_path(&mut self) -> bool {
        if self.path.take().is_none() {
            return false;
        }
        self.events.push(EditorEvent::PathCleared);
        true
    }

    /// Removes start, end and pickups, and the path that was routed through them.
    pub fn clear_all_points(&mut self) -> bool {
        let had_points = !self.points.is_empty();
        self.points.clear();
        if had_points {
            self.route_epoch += 1;
            self.events.push(EditorEvent::PointsChanged);
        }
        let had_path = self.clear_path();
        had_points || had_path
    }

    /// Resets every cell to walkable. Returns the number of cells that changed.
    pub fn clear_obstacles(&mut self) -> usize {
        let cleared = self.grid.obstacle_cells().collect::<Vec<_>>();
        let count = self.grid.clear_all();
        if count > 0 {
            self.dirty = true;
            self.route_epoch += 1;
            tracing::info!(cells = count, "cleared obstacles");
            self.events.push(EditorEvent::CellsChanged(cleared));
        }
        self.clear_path();
        count
    }

    /// Replaces the grid with a fresh walkable one.
    pub fn initialize_grid(
        &mut self,
        rows: usize,
        columns: usize,
        extent: RealExtent,
        source: GridSource,
    ) -> Result<(), EditError> {
        if source == GridSource::Manual {
            validate_manual_dimensions(rows, columns, self.config.max_manual_dimension)?;
        }
        let grid = Grid::new(rows, columns, extent).map_err(ValidationError::Grid)?;
        tracing::info!(rows, columns, ?source, "initialized grid");
        self.replace_grid(grid, None);
        Ok(())
    }

    /// Installs a grid loaded from storage; it counts as saved under `grid_id`.
    pub fn load_grid(&mut self, grid_id: String, grid: Grid) {
        tracing::info!(%grid_id, rows = grid.rows(), columns = grid.columns(), "loaded grid");
        self.replace_grid(grid, Some(grid_id));
    }

    /// Validates a stored document and installs it under its id.
    pub fn load_document(&mut self, doc: &GridDocument) -> Result<(), EditError> {
        let grid = doc.to_grid().map_err(ValidationError::Grid)?;
        self.load_grid(doc.id.clone(), grid);
        Ok(())
    }

    fn replace_grid(&mut self, grid: Grid, grid_id: Option<String>) {
        let (rows, columns) = (grid.rows(), grid.columns());
        self.grid = grid;
        self.grid_id = grid_id;
        self.dirty = false;
        self.drag = None;
        self.generation += 1;
        self.route_epoch += 1;
        self.points.clear();
        self.path = None;
        self.events.push(EditorEvent::GridReplaced { rows, columns });
    }

    pub fn set_background_image(&mut self, image_id: Option<String>) {
        if self.grid.image_id() != image_id.as_deref() {
            self.grid.set_image_id(image_id);
            self.dirty = true;
        }
    }

    pub fn mark_saved(&mut self, grid_id: String) {
        tracing::info!(%grid_id, "grid saved");
        self.grid_id = Some(grid_id);
        self.dirty = false;
    }

    /// Records a finished save of `saved`; edits made while it was in flight keep the grid dirty.
    pub fn confirm_save(&mut self, grid_id: String, saved: &[Vec<u8>]) {
        let current = self.grid.to_matrix();
        self.mark_saved(grid_id);
        self.dirty = current.as_slice() != saved;
    }

    /// Forgets the storage id, e.g. after the stored document was deleted.
    pub fn mark_unsaved(&mut self) {
        self.grid_id = None;
    }

    pub fn path_request(&self, algorithm: Option<&str>) -> Result<PathQuery, EditError> {
        let grid_id = self.grid_id.clone().ok_or(ValidationError::GridNotSaved)?;
        let start = self.points.start().ok_or(ValidationError::MissingStart)?;
        let end = self.points.end().ok_or(ValidationError::MissingEnd)?;
        Ok(PathQuery {
            grid_id,
            start,
            end,
            pickups: self.points.pickups().iter().copied().collect(),
            algorithm: algorithm.unwrap_or(DEFAULT_ALGORITHM).to_owned(),
            route_epoch: self.route_epoch,
        })
    }

    /// Installs a path requested under `query_epoch`. Returns `Ok(false)` and leaves the editor untouched
    /// when points or obstacles changed after the query was taken.
    pub fn apply_path_for(
        &mut self,
        query_epoch: u64,
        cells: Vec<CellPos>,
        metrics: PathMetrics,
    ) -> Result<bool, EditError> {
        if query_epoch != self.route_epoch {
            tracing::warn!(
                issued = query_epoch,
                current = self.route_epoch,
                "discarding path computed for edited points or obstacles"
            );
            return Ok(false);
        }
        self.apply_path(cells, metrics)?;
        Ok(true)
    }

    /// Installs a service path. Every cell must lie inside the current grid.
    pub fn apply_path(&mut self, cells: Vec<CellPos>, metrics: PathMetrics) -> Result<(), EditError> {
        if let Some(&pos) = cells.iter().find(|&&pos| !self.grid.contains(pos)) {
            tracing::warn!(%pos, "path cell outside grid; rejecting path");
            return Err(ValidationError::PathOutOfBounds { pos }.into());
        }
        tracing::info!(cells = cells.len(), "path applied");
        self.path = Some(Path::new(cells).with_metrics(metrics));
        self.events.push(EditorEvent::PathReplaced);
        Ok(())
    }

    pub fn product_placement(
        &self,
        pos: CellPos,
        product: ProductDraft,
    ) -> Result<ProductPlacement, EditError> {
        self.check_bounds(pos)?;
        product.validate().map_err(ValidationError::Product)?;
        let grid_id = self.grid_id.clone().ok_or(ValidationError::GridNotSaved)?;
        Ok(ProductPlacement { grid_id, pos, product })
    }

    pub fn stats(&self) -> EditorStats {
        let (path_cells, path_distance_m) = match &self.path {
            Some(path) => {
                (path.len(), CoordinateMapper::for_grid(&self.grid).real_distance(path.cells()))
            }
            None => (0, 0.0),
        };
        EditorStats {
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            obstacles: self.grid.obstacle_count(),
            walkable: self.grid.walkable_count(),
            pickups: self.points.pickup_count(),
            has_start: self.points.start().is_some(),
            has_end: self.points.end().is_some(),
            path_cells,
            path_distance_m,
            saved: self.grid_id.is_some(),
            dirty: self.dirty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Grid(GridError),
    ManualDimension { name: &'static str, value: usize, max: usize },
    TooManyPickups { max: usize },
    GridNotSaved,
    MissingStart,
    MissingEnd,
    PathOutOfBounds { pos: CellPos },
    Product(ProductError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(err) => write!(f, "{err}"),
            Self::ManualDimension { name, value, max } => {
                write!(f, "{name} must be between 1 and {max} for manual entry (got {value})")
            }
            Self::TooManyPickups { max } => write!(f, "at most {max} pickup points are allowed"),
            Self::GridNotSaved => f.write_str("save the grid first"),
            Self::MissingStart => f.write_str("select a start point first"),
            Self::MissingEnd => f.write_str("select an end point first"),
            Self::PathOutOfBounds { pos } => write!(f, "path cell {pos} is outside the grid"),
            Self::Product(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            Self::Product(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Validation(ValidationError),
    Bounds(GridError),
}

impl EditError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationError> for EditError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<GridError> for EditError {
    fn from(err: GridError) -> Self {
        if err.is_bounds() {
            Self::Bounds(err)
        } else {
            Self::Validation(ValidationError::Grid(err))
        }
    }
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Bounds(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Bounds(err) => Some(err),
        }
    }
}

// Pointer handling: drag painting and point clicks.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
