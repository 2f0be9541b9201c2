// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::cell::CellPos;

/// Metrics reported by the pathfinding service alongside a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMetrics {
    pub total_distance: Option<f64>,
    pub computation_time: Option<f64>,
    pub algorithm_used: Option<String>,
}

/// Ordered cells returned by the pathfinding service. Never edited locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cells: Vec<CellPos>,
    metrics: PathMetrics,
}

impl Path {
    pub fn new(cells: Vec<CellPos>) -> Self {
        Self { cells, metrics: PathMetrics::default() }
    }

    pub fn with_metrics(mut self, metrics: PathMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cells(&self) -> &[CellPos] {
        &self.cells
    }

    pub fn metrics(&self) -> &PathMetrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
