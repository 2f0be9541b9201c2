// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A grid holds walkable/obstacle cells plus the real-world extent it covers; routing points and
//! the returned path reference cells of that grid by `(row, col)`.

pub mod cell;
pub mod coords;
pub(crate) mod fixtures;
pub mod grid;
pub mod path;
pub mod points;

pub use cell::{CellPos, CellState};
pub use coords::CoordinateMapper;
pub use grid::{Grid, GridError, RealExtent, MAX_DIMENSION, MIN_DIMENSION};
pub use path::{Path, PathMetrics};
pub use points::{PickupToggle, PointRole, RoutingPoints};
