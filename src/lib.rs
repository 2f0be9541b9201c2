// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Floorgrid: a terminal editor for warehouse floor grids.
//!
//! The grid, routing points and paths live in [`model`]; [`ops`] turns pointer input into
//! edits; [`layout`] sizes cells for the terminal; [`render`] classifies cells and animates
//! paths; [`service`] talks to the grid, image, pathfinding and product services.

pub mod config;
pub mod floorplan;
pub mod layout;
pub mod logging;
pub mod model;
pub mod ops;
pub mod render;
pub mod service;
pub mod tui;
