// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{cell_mark, PathOverlay};
use crate::model::{CellPos, Grid, RoutingPoints};

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if text.chars().count() <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// One glyph per cell, one line per row. Used for snapshots and logs.
pub fn render_grid_text(grid: &Grid, points: &RoutingPoints, overlay: &PathOverlay) -> String {
    let mut out = String::with_capacity((grid.columns() + 1) * grid.rows());
    for row in 0..grid.rows() {
        if row > 0 {
            out.push('\n');
        }
        for col in 0..grid.columns() {
            out.push(cell_mark(grid, points, overlay, CellPos::new(row, col)).glyph());
        }
    }
    out
}
