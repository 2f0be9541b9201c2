// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Pointer-driven mutations used by the terminal front-end.
/// Keeps `ops::mod` focused on session state and commands.
impl Editor {
    fn check_bounds(&self, pos: CellPos) -> Result<(), EditError> {
        if self.grid.contains(pos) {
            return Ok(());
        }
        tracing::error!(%pos, rows = self.grid.rows(), columns = self.grid.columns(), "cell outside grid");
        Err(EditError::Bounds(GridError::OutOfBounds {
            pos,
            rows: self.grid.rows(),
            columns: self.grid.columns(),
        }))
    }

    /// Pointer pressed over `pos`.
    ///
    /// Paint modes start a stroke and paint `pos` right away; point modes apply a single click.
    /// Returns whether any state changed.
    pub fn pointer_down(&mut self, pos: CellPos) -> Result<bool, EditError> {
        self.check_bounds(pos)?;
        if let Some(paint) = self.mode.paint_state() {
            let mut gesture = DragGesture::begin(paint, pos);
            let changed = self.paint(&mut gesture, pos);
            self.drag = Some(gesture);
            return changed;
        }
        match self.mode.point_role() {
            Some(PointRole::Start) => self.set_start(pos),
            Some(PointRole::End) => self.set_end(pos),
            Some(PointRole::Pickup) => self.toggle_pickup(pos),
            None => Ok(false),
        }
    }

    /// Pointer moved onto `pos` while pressed. A no-op outside a paint stroke.
    pub fn pointer_enter(&mut self, pos: CellPos) -> Result<bool, EditError> {
        if self.drag.is_none() {
            return Ok(false);
        }
        self.check_bounds(pos)?;
        let Some(mut gesture) = self.drag.take() else {
            return Ok(false);
        };
        let result = if gesture.enter(pos) { self.paint(&mut gesture, pos) } else { Ok(false) };
        self.drag = Some(gesture);
        result
    }

    /// Ends the current stroke and returns how many cells it changed.
    pub fn pointer_up(&mut self) -> Option<usize> {
        let gesture = self.drag.take()?;
        tracing::debug!(
            visited = gesture.visited_count(),
            changed = gesture.changed_count(),
            "paint stroke finished"
        );
        Some(gesture.changed_count())
    }

    fn paint(&mut self, gesture: &mut DragGesture, pos: CellPos) -> Result<bool, EditError> {
        // Routing points never sit on obstacles, so their cells are left alone.
        if self.points.contains(pos) {
            return Ok(false);
        }
        let changed = self.grid.set_cell(pos, gesture.paint())?;
        if changed {
            gesture.record_change();
            self.dirty = true;
            self.route_epoch += 1;
            self.events.push(EditorEvent::CellsChanged(vec![pos]));
            self.clear_path();
        }
        Ok(changed)
    }

    /// Obstacle cells cannot carry routing points; clicks on them are ignored.
    fn accepts_point(&self, pos: CellPos) -> Result<bool, EditError> {
        self.check_bounds(pos)?;
        Ok(!self.grid.is_obstacle(pos))
    }

    fn points_changed(&mut self) {
        self.route_epoch += 1;
        self.events.push(EditorEvent::PointsChanged);
        self.clear_path();
    }

    pub fn set_start(&mut self, pos: CellPos) -> Result<bool, EditError> {
        if !self.accepts_point(pos)? || self.points.start() == Some(pos) {
            return Ok(false);
        }
        self.points.set_start(pos);
        self.points_changed();
        Ok(true)
    }

    pub fn set_end(&mut self, pos: CellPos) -> Result<bool, EditError> {
        if !self.accepts_point(pos)? || self.points.end() == Some(pos) {
            return Ok(false);
        }
        self.points.set_end(pos);
        self.points_changed();
        Ok(true)
    }

    pub fn toggle_pickup(&mut self, pos: CellPos) -> Result<bool, EditError> {
        if !self.accepts_point(pos)? {
            return Ok(false);
        }
        let adding = !self.points.pickups().contains(&pos);
        let max = self.config.max_pickup_points;
        if adding && self.points.pickup_count() >= max {
            return Err(ValidationError::TooManyPickups { max }.into());
        }
        if self.points.toggle_pickup(pos) == PickupToggle::Added {
            tracing::debug!(%pos, "pickup added");
        }
        self.points_changed();
        Ok(true)
    }
}
