// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use super::cell::CellPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRole {
    Start,
    End,
    Pickup,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Pickup => "pickup",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupToggle {
    Added,
    Removed,
}

/// Start/end/pickup selection for a single grid.
///
/// A cell carries at most one role: assigning a role to a cell removes whatever role the cell
/// had before. Obstacle checks are the caller's job since this type does not see the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingPoints {
    start: Option<CellPos>,
    end: Option<CellPos>,
    pickups: BTreeSet<CellPos>,
}

impl RoutingPoints {
    pub fn start(&self) -> Option<CellPos> {
        self.start
    }

    pub fn end(&self) -> Option<CellPos> {
        self.end
    }

    pub fn pickups(&self) -> &BTreeSet<CellPos> {
        &self.pickups
    }

    pub fn pickup_count(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.pickups.is_empty()
    }

    pub fn role_at(&self, pos: CellPos) -> Option<PointRole> {
        if self.start == Some(pos) {
            Some(PointRole::Start)
        } else if self.end == Some(pos) {
            Some(PointRole::End)
        } else if self.pickups.contains(&pos) {
            Some(PointRole::Pickup)
        } else {
            None
        }
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.role_at(pos).is_some()
    }

    /// Removes any role held by `pos`.
    pub fn remove_at(&mut self, pos: CellPos) -> Option<PointRole> {
        let role = self.role_at(pos)?;
        match role {
            PointRole::Start => self.start = None,
            PointRole::End => self.end = None,
            PointRole::Pickup => {
                self.pickups.remove(&pos);
            }
        }
        Some(role)
    }

    /// Moves the start to `pos` and returns the cell that previously held it.
    pub fn set_start(&mut self, pos: CellPos) -> Option<CellPos> {
        if self.start == Some(pos) {
            return None;
        }
        self.remove_at(pos);
        self.start.replace(pos)
    }

    /// Moves the end to `pos` and returns the cell that previously held it.
    pub fn set_end(&mut self, pos: CellPos) -> Option<CellPos> {
        if self.end == Some(pos) {
            return None;
        }
        self.remove_at(pos);
        self.end.replace(pos)
    }

    pub fn toggle_pickup(&mut self, pos: CellPos) -> PickupToggle {
        if self.pickups.remove(&pos) {
            return PickupToggle::Removed;
        }
        self.remove_at(pos);
        self.pickups.insert(pos);
        PickupToggle::Added
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.pickups.clear();
    }

    /// Every cell that carries a role, start and end first.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, PointRole)> + '_ {
        self.start
            .map(|pos| (pos, PointRole::Start))
            .into_iter()
            .chain(self.end.map(|pos| (pos, PointRole::End)))
            .chain(self.pickups.iter().map(|&pos| (pos, PointRole::Pickup)))
    }
}
