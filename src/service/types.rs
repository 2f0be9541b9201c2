// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON payloads exchanged with the grid, image, pathfinding and product services.

use serde::{Deserialize, Serialize};

use crate::model::{CellPos, Grid, GridError, PathMetrics, RealExtent};
use crate::ops::{PathQuery, ProductPlacement};

/// A cell on the wire: `x` is the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: usize,
    pub y: usize,
}

impl From<CellPos> for WirePoint {
    fn from(pos: CellPos) -> Self {
        Self { x: pos.row, y: pos.col }
    }
}

impl From<WirePoint> for CellPos {
    fn from(point: WirePoint) -> Self {
        CellPos::new(point.x, point.y)
    }
}

/// Body of `POST /api/grid/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPayload {
    pub rows: usize,
    pub columns: usize,
    pub grid: Vec<Vec<u8>>,
    pub actual_width: f64,
    pub actual_length: f64,
    #[serde(default)]
    pub image_id: Option<String>,
}

impl GridPayload {
    pub fn from_grid(grid: &Grid) -> Self {
        let extent = grid.extent();
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            grid: grid.to_matrix(),
            actual_width: extent.width_m(),
            actual_length: extent.length_m(),
            image_id: grid.image_id().map(str::to_owned),
        }
    }
}

/// A stored grid as returned by the grid endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    pub id: String,
    pub rows: usize,
    pub columns: usize,
    pub grid: Vec<Vec<u8>>,
    pub actual_width: f64,
    pub actual_length: f64,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl GridDocument {
    /// Validates the wire matrix and its declared shape.
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        let extent = RealExtent::new(self.actual_width, self.actual_length)?;
        let grid = Grid::from_matrix(&self.grid, extent, self.image_id.clone())?;
        if (grid.rows(), grid.columns()) != (self.rows, self.columns) {
            return Err(GridError::ShapeMismatch {
                declared: (self.rows, self.columns),
                found: (grid.rows(), grid.columns()),
            });
        }
        Ok(grid)
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            id: self.id.clone(),
            rows: self.rows,
            columns: self.columns,
            actual_width: self.actual_width,
            actual_length: self.actual_length,
            timestamp: self.timestamp.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub id: String,
    pub rows: usize,
    pub columns: usize,
    pub actual_width: f64,
    pub actual_length: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub image_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub message: String,
}

/// JSON form of `GET /api/image/{id}`; either field may carry the base64 data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDataResponse {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    pub grid_id: String,
    pub start: WirePoint,
    pub end: WirePoint,
    pub pickup_points: Vec<WirePoint>,
    pub algorithm: String,
}

impl From<&PathQuery> for PathRequest {
    fn from(query: &PathQuery) -> Self {
        Self {
            grid_id: query.grid_id.clone(),
            start: query.start.into(),
            end: query.end.into(),
            pickup_points: query.pickups.iter().copied().map(WirePoint::from).collect(),
            algorithm: query.algorithm.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResponse {
    pub path: Vec<WirePoint>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub computation_time: Option<f64>,
    #[serde(default)]
    pub algorithm_used: Option<String>,
}

impl PathResponse {
    pub fn cells(&self) -> Vec<CellPos> {
        self.path.iter().copied().map(CellPos::from).collect()
    }

    pub fn metrics(&self) -> PathMetrics {
        PathMetrics {
            total_distance: self.total_distance,
            computation_time: self.computation_time,
            algorithm_used: self.algorithm_used.clone(),
        }
    }
}

/// Body of `POST /api/save_product`. Coordinates follow the wire point convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub product_name: String,
    pub product_id: String,
    pub weight: f64,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub x_coord: usize,
    pub y_coord: usize,
    pub grid_id: String,
}

impl From<&ProductPlacement> for ProductPayload {
    fn from(placement: &ProductPlacement) -> Self {
        let product = &placement.product;
        Self {
            product_name: product.name.clone(),
            product_id: product.product_id.clone(),
            weight: product.weight_kg,
            height: product.height_cm,
            width: product.width_cm,
            length: product.length_cm,
            x_coord: placement.pos.row,
            y_coord: placement.pos.col,
            grid_id: placement.grid_id.clone(),
        }
    }
}

/// Generic `{message, ...}` confirmation body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: String,
}

/// Error body; `detail` is a string for handled errors and a list for request validation errors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorPayload {
    pub detail: serde_json::Value,
}

impl ErrorPayload {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item.get("msg").and_then(serde_json::Value::as_str) {
                    Some(msg) => msg.to_owned(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
