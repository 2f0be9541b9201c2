// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use super::debounce::ResizeDebouncer;
use super::display::{
    compute_display_settings, ContainerSize, DisplaySettings, LayoutInput, LayoutMode,
};
use super::viewport::{GlyphMetrics, Viewport};
use super::zoom::Zoom;
use crate::config::LayoutConfig;
use crate::model::CellPos;

/// Owns every input of the display computation and recomputes on each change.
///
/// Zoom, fullscreen and grid changes recompute immediately; container resizes go through the
/// debouncer and are applied by [`LayoutEngine::poll`].
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    zoom: Zoom,
    mode: LayoutMode,
    container: ContainerSize,
    rows: usize,
    columns: usize,
    debouncer: ResizeDebouncer,
    settings: DisplaySettings,
    scroll: (usize, usize),
    advisory_pending: bool,
    recomputations: u64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, rows: usize, columns: usize) -> Self {
        let zoom = Zoom::new(&config);
        let debouncer = ResizeDebouncer::new(Duration::from_millis(config.resize_debounce_ms));
        let container = ContainerSize::default();
        let settings = compute_display_settings(
            &LayoutInput { container, rows, columns, zoom: zoom.level(), mode: LayoutMode::Normal },
            &config,
        );
        Self {
            config,
            zoom,
            mode: LayoutMode::Normal,
            container,
            rows,
            columns,
            debouncer,
            settings,
            scroll: (0, 0),
            advisory_pending: true,
            recomputations: 0,
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.level()
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// Number of display recomputations so far.
    pub fn recompute_count(&self) -> u64 {
        self.recomputations
    }

    fn recompute(&mut self) -> bool {
        let input = LayoutInput {
            container: self.container,
            rows: self.rows,
            columns: self.columns,
            zoom: self.zoom.level(),
            mode: self.mode,
        };
        let next = compute_display_settings(&input, &self.config);
        self.recomputations += 1;
        if next.degraded() && !self.settings.degraded() {
            tracing::warn!(
                width = self.container.width,
                height = self.container.height,
                "container has no usable size; using default cell size"
            );
        }
        tracing::debug!(
            cell_size = next.cell_size(),
            base = next.base_cell_size(),
            zoom = next.zoom(),
            mode = ?next.mode(),
            aspect = ?next.aspect(),
            "layout recomputed"
        );
        let changed = next != self.settings;
        self.settings = next;
        changed
    }

    /// Applies a container size immediately, bypassing the debouncer.
    pub fn set_container(&mut self, size: ContainerSize) -> bool {
        self.container = size;
        self.recompute()
    }

    pub fn on_resize(&mut self, size: ContainerSize, now: Instant) {
        self.debouncer.push(size, now);
    }

    /// Applies a settled resize. Returns `true` when the display settings changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(size) => self.set_container(size),
            None => false,
        }
    }

    pub fn resize_pending_for(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in() && self.recompute()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out() && self.recompute()
    }

    /// Resets zoom to 1.0 and recomputes against the current container.
    pub fn fit_to_screen(&mut self) -> bool {
        self.zoom.reset();
        self.scroll = (0, 0);
        self.recompute()
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> bool {
        let mode = if fullscreen { LayoutMode::Fullscreen } else { LayoutMode::Normal };
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.recompute()
    }

    pub fn toggle_fullscreen(&mut self) -> LayoutMode {
        self.set_fullscreen(self.mode == LayoutMode::Normal);
        self.mode
    }

    /// New grid dimensions: zoom and scroll reset, fullscreen advisory re-armed.
    pub fn load_grid(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
        self.zoom.reset();
        self.scroll = (0, 0);
        self.advisory_pending = true;
        self.recompute();
    }

    /// One-shot fullscreen suggestion for the current grid.
    pub fn take_fullscreen_advisory(&mut self) -> bool {
        if !self.advisory_pending || self.settings.degraded() || !self.settings.suggest_fullscreen()
        {
            return false;
        }
        self.advisory_pending = false;
        true
    }

    /// Viewport over a `width`×`height` glyph area; the clamped scroll offset is kept.
    pub fn viewport(&mut self, width: u16, height: u16) -> Viewport {
        let glyph = GlyphMetrics::from_config(&self.config);
        let viewport = Viewport::new(&self.settings, glyph, width, height, self.scroll);
        self.scroll = viewport.scroll();
        viewport
    }

    pub fn scroll_by(&mut self, dx: isize, dy: isize, width: u16, height: u16) -> bool {
        let mut viewport = self.viewport(width, height);
        let moved = viewport.scroll_by(dx, dy);
        self.scroll = viewport.scroll();
        moved
    }

    pub fn scroll_into_view(&mut self, pos: CellPos, width: u16, height: u16) -> bool {
        let mut viewport = self.viewport(width, height);
        let moved = viewport.scroll_into_view(pos);
        self.scroll = viewport.scroll();
        moved
    }
}
