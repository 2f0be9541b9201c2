// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::LayoutConfig;

/// Zoom factor stepped in fixed increments within a closed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    level: f64,
    step: f64,
    min: f64,
    max: f64,
}

impl Zoom {
    pub fn new(config: &LayoutConfig) -> Self {
        Self { level: 1.0, step: config.zoom_step, min: config.min_zoom, max: config.max_zoom }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Returns `false` when already at the maximum.
    pub fn zoom_in(&mut self) -> bool {
        self.set(self.level + self.step)
    }

    /// Returns `false` when already at the minimum.
    pub fn zoom_out(&mut self) -> bool {
        self.set(self.level - self.step)
    }

    pub fn reset(&mut self) -> bool {
        self.set(1.0)
    }

    fn set(&mut self, level: f64) -> bool {
        // Snap to 1/1000 so repeated steps never drift off the 0.25 grid.
        let level = ((level * 1000.0).round() / 1000.0).clamp(self.min, self.max);
        if (level - self.level).abs() < f64::EPSILON {
            return false;
        }
        self.level = level;
        true
    }
}
