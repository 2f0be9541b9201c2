// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal glyph geometry for the grid.
//!
//! Pixel cell sizes from [`DisplaySettings`] are projected onto a glyph raster: a cell spans
//! `cell_size / glyph_width` columns and `cell_size / glyph_height` rows, never less than one glyph
//! on either axis. Scroll offsets are in glyphs and always clamped to the content.

use std::ops::Range;

use super::display::{AspectBehavior, DisplaySettings};
use crate::config::LayoutConfig;
use crate::model::CellPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width_px: u32,
    pub height_px: u32,
}

impl GlyphMetrics {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self { width_px: config.glyph_width_px.max(1), height_px: config.glyph_height_px.max(1) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: usize,
    height: usize,
    cell_cols: usize,
    cell_rows: usize,
    rows: usize,
    columns: usize,
    scroll_x: usize,
    scroll_y: usize,
    pad_x: usize,
    pad_y: usize,
}

impl Viewport {
    /// Builds a viewport of `width`×`height` glyphs; `scroll` is clamped to the content.
    pub fn new(
        settings: &DisplaySettings,
        glyph: GlyphMetrics,
        width: u16,
        height: u16,
        scroll: (usize, usize),
    ) -> Self {
        let cell = settings.cell_size();
        let cell_cols = (cell / glyph.width_px.max(1)).max(1) as usize;
        let cell_rows = (cell / glyph.height_px.max(1)).max(1) as usize;
        let width = usize::from(width);
        let height = usize::from(height);
        let content_w = settings.columns() * cell_cols;
        let content_h = settings.rows() * cell_rows;

        let spare_x = width.saturating_sub(content_w);
        let spare_y = height.saturating_sub(content_h);
        let (pad_x, pad_y) = match settings.aspect() {
            AspectBehavior::Wide => (0, spare_y / 2),
            AspectBehavior::Tall => (spare_x / 2, 0),
            AspectBehavior::Balanced => (spare_x / 2, spare_y / 2),
        };

        let mut viewport = Self {
            width,
            height,
            cell_cols,
            cell_rows,
            rows: settings.rows(),
            columns: settings.columns(),
            scroll_x: scroll.0,
            scroll_y: scroll.1,
            pad_x,
            pad_y,
        };
        viewport.clamp_scroll();
        viewport
    }

    /// Glyphs spanned by one cell: `(columns, rows)`.
    pub fn glyphs_per_cell(&self) -> (usize, usize) {
        (self.cell_cols, self.cell_rows)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn content_size(&self) -> (usize, usize) {
        (self.columns * self.cell_cols, self.rows * self.cell_rows)
    }

    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn max_scroll(&self) -> (usize, usize) {
        let (content_w, content_h) = self.content_size();
        (content_w.saturating_sub(self.width), content_h.saturating_sub(self.height))
    }

    pub fn padding(&self) -> (usize, usize) {
        (self.pad_x, self.pad_y)
    }

    fn clamp_scroll(&mut self) {
        let (max_x, max_y) = self.max_scroll();
        self.scroll_x = self.scroll_x.min(max_x);
        self.scroll_y = self.scroll_y.min(max_y);
    }

    /// Returns whether the offset moved.
    pub fn scroll_by(&mut self, dx: isize, dy: isize) -> bool {
        let before = self.scroll();
        self.scroll_x = self.scroll_x.saturating_add_signed(dx);
        self.scroll_y = self.scroll_y.saturating_add_signed(dy);
        self.clamp_scroll();
        before != self.scroll()
    }

    /// Cell under the glyph at `(x, y)`, relative to the viewport's top-left corner.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<CellPos> {
        let (x, y) = (usize::from(x), usize::from(y));
        if x >= self.width || y >= self.height || x < self.pad_x || y < self.pad_y {
            return None;
        }
        let col = (x - self.pad_x + self.scroll_x) / self.cell_cols;
        let row = (y - self.pad_y + self.scroll_y) / self.cell_rows;
        (row < self.rows && col < self.columns).then_some(CellPos::new(row, col))
    }

    /// Glyph position of the cell's top-left corner, if that corner is inside the viewport.
    pub fn cell_origin(&self, pos: CellPos) -> Option<(u16, u16)> {
        if pos.row >= self.rows || pos.col >= self.columns {
            return None;
        }
        let x = (pos.col * self.cell_cols + self.pad_x).checked_sub(self.scroll_x)?;
        let y = (pos.row * self.cell_rows + self.pad_y).checked_sub(self.scroll_y)?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    pub fn visible_rows(&self) -> Range<usize> {
        visible_range(self.scroll_y, self.height.saturating_sub(self.pad_y), self.cell_rows, self.rows)
    }

    pub fn visible_columns(&self) -> Range<usize> {
        visible_range(self.scroll_x, self.width.saturating_sub(self.pad_x), self.cell_cols, self.columns)
    }

    /// Adjusts the scroll offset minimally so `pos` is fully visible.
    pub fn scroll_into_view(&mut self, pos: CellPos) -> bool {
        let before = self.scroll();
        self.scroll_x = scroll_axis(self.scroll_x, pos.col * self.cell_cols, self.cell_cols, self.width);
        self.scroll_y = scroll_axis(self.scroll_y, pos.row * self.cell_rows, self.cell_rows, self.height);
        self.clamp_scroll();
        before != self.scroll()
    }
}

fn visible_range(scroll: usize, span: usize, per_cell: usize, count: usize) -> Range<usize> {
    let start = (scroll / per_cell).min(count);
    let end = (scroll + span).div_ceil(per_cell).min(count);
    start..end.max(start)
}

fn scroll_axis(scroll: usize, start: usize, len: usize, span: usize) -> usize {
    if start < scroll {
        start
    } else if start + len > scroll + span {
        (start + len).saturating_sub(span)
    } else {
        scroll
    }
}
