// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::LayoutConfig;
use crate::model::CellPos;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutMode {
    #[default]
    Normal,
    Fullscreen,
}

/// Which axis is expected to scroll for the current grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectBehavior {
    /// Noticeably wider than tall; horizontal scrolling.
    Wide,
    /// Noticeably taller than wide; vertical scrolling.
    Tall,
    /// Both axes scroll, content centered.
    Balanced,
}

pub fn aspect_behavior(rows: usize, columns: usize) -> AspectBehavior {
    let ratio = columns as f64 / rows.max(1) as f64;
    if ratio > 1.5 {
        AspectBehavior::Wide
    } else if ratio < 0.67 {
        AspectBehavior::Tall
    } else {
        AspectBehavior::Balanced
    }
}

/// Available drawing area, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    pub container: ContainerSize,
    pub rows: usize,
    pub columns: usize,
    pub zoom: f64,
    pub mode: LayoutMode,
}

/// Derived geometry for drawing the grid. Recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySettings {
    cell_size: u32,
    base_cell_size: u32,
    zoom: f64,
    mode: LayoutMode,
    aspect: AspectBehavior,
    suggest_fullscreen: bool,
    degraded: bool,
    rows: usize,
    columns: usize,
}

impl DisplaySettings {
    /// Edge length of one square cell, in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Cell size before zoom and clamping.
    pub fn base_cell_size(&self) -> u32 {
        self.base_cell_size
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn aspect(&self) -> AspectBehavior {
        self.aspect
    }

    pub fn suggest_fullscreen(&self) -> bool {
        self.suggest_fullscreen
    }

    /// The container had no usable size and the default cell size was used.
    pub fn degraded(&self) -> bool {
        self.degraded
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Full grid size at the current cell size, in pixels.
    pub fn content_size(&self) -> (u64, u64) {
        let cell = u64::from(self.cell_size);
        (self.columns as u64 * cell, self.rows as u64 * cell)
    }

    /// Top-left pixel of `pos` relative to the grid origin.
    pub fn cell_origin_px(&self, pos: CellPos) -> (u64, u64) {
        let cell = u64::from(self.cell_size);
        (pos.col as u64 * cell, pos.row as u64 * cell)
    }

    /// Cell under a pixel position relative to the grid origin.
    pub fn cell_at_px(&self, x: u64, y: u64) -> Option<CellPos> {
        let cell = u64::from(self.cell_size.max(1));
        let col = usize::try_from(x / cell).ok()?;
        let row = usize::try_from(y / cell).ok()?;
        (row < self.rows && col < self.columns).then_some(CellPos::new(row, col))
    }
}

fn cell_size_bounds(mode: LayoutMode, config: &LayoutConfig) -> (u32, u32) {
    let max = match mode {
        LayoutMode::Normal => config.max_cell_size,
        LayoutMode::Fullscreen => config.max_cell_size.saturating_mul(2),
    };
    (config.min_cell_size, max.max(config.min_cell_size))
}

/// Computes square cell geometry for a grid inside a container.
///
/// A zero-sized container (not laid out yet, or minimized) falls back to the configured default
/// cell size instead of dividing by zero; `degraded()` reports that case.
pub fn compute_display_settings(input: &LayoutInput, config: &LayoutConfig) -> DisplaySettings {
    let rows = input.rows.max(1);
    let columns = input.columns.max(1);
    let degraded = input.container.is_empty();

    let base_cell_size = if degraded {
        config.default_cell_size
    } else {
        let per_column = input.container.width as usize / columns;
        let per_row = input.container.height as usize / rows;
        u32::try_from(per_column.min(per_row)).unwrap_or(u32::MAX)
    };

    let zoom = if input.zoom.is_finite() && input.zoom > 0.0 { input.zoom } else { 1.0 };
    let (min, max) = cell_size_bounds(input.mode, config);
    let zoomed = (f64::from(base_cell_size) * zoom).floor();
    let cell_size = zoomed.clamp(f64::from(min), f64::from(max)) as u32;

    let suggest_fullscreen = input.mode == LayoutMode::Normal
        && (base_cell_size < config.min_cell_size.saturating_mul(2)
            || rows > config.dense_grid_threshold
            || columns > config.dense_grid_threshold);

    DisplaySettings {
        cell_size,
        base_cell_size,
        zoom,
        mode: input.mode,
        aspect: aspect_behavior(rows, columns),
        suggest_fullscreen,
        degraded,
        rows,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        aspect_behavior, compute_display_settings, AspectBehavior, ContainerSize, LayoutInput,
        LayoutMode,
    };
    use crate::config::LayoutConfig;
    use crate::model::CellPos;

    fn input(width: u32, height: u32, rows: usize, columns: usize, zoom: f64) -> LayoutInput {
        LayoutInput {
            container: ContainerSize::new(width, height),
            rows,
            columns,
            zoom,
            mode: LayoutMode::Normal,
        }
    }

    #[test]
    fn base_cell_size_uses_the_tighter_axis_and_clamps() {
        let config = LayoutConfig::default();
        let settings = compute_display_settings(&input(1000, 500, 10, 20, 1.0), &config);
        assert_eq!(settings.base_cell_size(), 50);
        assert_eq!(settings.cell_size(), config.max_cell_size);
        assert!(settings.cell_size() >= config.min_cell_size);
        assert!(!settings.degraded());
    }

    #[test]
    fn zoom_scales_then_floors_and_clamps() {
        let config = LayoutConfig::default();
        let settings = compute_display_settings(&input(300, 300, 10, 10, 1.25), &config);
        assert_eq!(settings.base_cell_size(), 30);
        assert_eq!(settings.cell_size(), 37);

        let settings = compute_display_settings(&input(300, 300, 10, 10, 0.1), &config);
        assert_eq!(settings.cell_size(), config.min_cell_size);
    }

    #[test]
    fn fullscreen_doubles_the_ceiling() {
        let config = LayoutConfig::default();
        let mut layout = input(2000, 2000, 10, 10, 1.0);
        assert_eq!(compute_display_settings(&layout, &config).cell_size(), 40);

        layout.mode = LayoutMode::Fullscreen;
        let settings = compute_display_settings(&layout, &config);
        assert_eq!(settings.cell_size(), 80);
        assert!(!settings.suggest_fullscreen());
    }

    #[rstest]
    #[case(1000, 1000, 10, 10, false)]
    #[case(1000, 1000, 51, 10, true)]
    #[case(1000, 1000, 10, 51, true)]
    #[case(150, 150, 10, 10, true)]
    #[case(160, 160, 10, 10, false)]
    fn fullscreen_is_suggested_for_dense_grids(
        #[case] width: u32,
        #[case] height: u32,
        #[case] rows: usize,
        #[case] columns: usize,
        #[case] expected: bool,
    ) {
        let config = LayoutConfig::default();
        let settings = compute_display_settings(&input(width, height, rows, columns, 1.0), &config);
        assert_eq!(settings.suggest_fullscreen(), expected);
    }

    #[rstest]
    #[case(0, 500)]
    #[case(500, 0)]
    #[case(0, 0)]
    fn empty_container_falls_back_to_default_size(#[case] width: u32, #[case] height: u32) {
        let config = LayoutConfig::default();
        let settings = compute_display_settings(&input(width, height, 1000, 1000, 1.0), &config);
        assert!(settings.degraded());
        assert_eq!(settings.base_cell_size(), config.default_cell_size);
        assert_eq!(settings.cell_size(), config.default_cell_size);
    }

    #[rstest]
    #[case(10, 16, AspectBehavior::Wide)]
    #[case(10, 15, AspectBehavior::Balanced)]
    #[case(100, 66, AspectBehavior::Tall)]
    #[case(100, 67, AspectBehavior::Balanced)]
    #[case(1, 1, AspectBehavior::Balanced)]
    fn aspect_thresholds(#[case] rows: usize, #[case] columns: usize, #[case] expected: AspectBehavior) {
        assert_eq!(aspect_behavior(rows, columns), expected);
    }

    #[test]
    fn pixel_hit_testing_matches_cell_origins() {
        let config = LayoutConfig::default();
        let settings = compute_display_settings(&input(200, 100, 5, 10, 1.0), &config);
        assert_eq!(settings.cell_size(), 20);
        assert_eq!(settings.content_size(), (200, 100));

        let pos = CellPos::new(3, 7);
        let (x, y) = settings.cell_origin_px(pos);
        assert_eq!((x, y), (140, 60));
        assert_eq!(settings.cell_at_px(x, y), Some(pos));
        assert_eq!(settings.cell_at_px(x + 19, y + 19), Some(pos));
        assert_eq!(settings.cell_at_px(200, 0), None);
        assert_eq!(settings.cell_at_px(0, 100), None);
    }
}
