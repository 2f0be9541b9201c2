// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use tokio::sync::Mutex;

use super::types::{
    Confirmation, GridDocument, GridPayload, ImageUploadResponse, PathRequest, PathResponse,
    ProductPayload,
};
use super::{
    Backend, Endpoint, GridStore, ImageStore, Pathfinder, ProductStore, ServiceError, ServiceFuture,
};
use crate::model::CellPos;

/// Computes a path for the offline backend. Receives the request and the stored grid.
pub type PathResponder =
    Box<dyn Fn(&PathRequest, &GridDocument) -> Result<PathResponse, ServiceError> + Send + Sync>;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    grids: BTreeMap<String, GridDocument>,
    images: BTreeMap<String, (String, Vec<u8>)>,
    products: BTreeMap<String, ProductPayload>,
}

impl State {
    /// 24 hex digits, the shape of the ids the remote store hands out.
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", self.next_id)
    }
}

/// In-process stand-in for the remote services, used offline and in tests.
pub struct MemoryBackend {
    state: Mutex<State>,
    responder: Option<PathResponder>,
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("responder", &self.responder.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()), responder: None }
    }

    pub fn with_path_responder(mut self, responder: PathResponder) -> Self {
        self.responder = Some(responder);
        self
    }

    pub async fn product(&self, product_id: &str) -> Option<ProductPayload> {
        self.state.lock().await.products.get(product_id).cloned()
    }
}

fn status(endpoint: Endpoint, status: u16, detail: impl Into<String>) -> ServiceError {
    ServiceError::Status { endpoint, status, detail: detail.into() }
}

fn find_grid<'a>(
    state: &'a State,
    endpoint: Endpoint,
    grid_id: &str,
) -> Result<&'a GridDocument, ServiceError> {
    state.grids.get(grid_id).ok_or_else(|| status(endpoint, 404, "Grid not found"))
}

fn check_route_point(
    grid: &GridDocument,
    pos: CellPos,
    what: &str,
) -> Result<(), ServiceError> {
    let endpoint = Endpoint::FindPath;
    if pos.row >= grid.rows || pos.col >= grid.columns {
        return Err(status(endpoint, 400, format!("{what} point {pos} is outside the grid")));
    }
    if grid.grid[pos.row][pos.col] == 1 {
        return Err(status(endpoint, 400, format!("{what} point {pos} is an obstacle")));
    }
    Ok(())
}

impl GridStore for MemoryBackend {
    fn save_grid(&self, payload: GridPayload) -> ServiceFuture<'_, GridDocument> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let id = state.allocate_id();
            let doc = GridDocument {
                id: id.clone(),
                rows: payload.rows,
                columns: payload.columns,
                grid: payload.grid,
                actual_width: payload.actual_width,
                actual_length: payload.actual_length,
                image_id: payload.image_id,
                timestamp: None,
            };
            doc.to_grid().map_err(|err| status(Endpoint::SaveGrid, 422, err.to_string()))?;
            state.grids.insert(id, doc.clone());
            Ok(doc)
        })
    }

    fn list_grids(&self) -> ServiceFuture<'_, Vec<GridDocument>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            // Newest first; ids grow monotonically.
            Ok(state.grids.values().rev().cloned().collect())
        })
    }

    fn load_grid(&self, grid_id: String) -> ServiceFuture<'_, GridDocument> {
        Box::pin(async move {
            let state = self.state.lock().await;
            find_grid(&state, Endpoint::LoadGrid, &grid_id).cloned()
        })
    }

    fn delete_grid(&self, grid_id: String) -> ServiceFuture<'_, Confirmation> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            match state.grids.remove(&grid_id) {
                Some(_) => Ok(Confirmation { message: "Grid deleted successfully".to_owned() }),
                None => Err(status(Endpoint::DeleteGrid, 404, "Grid not found")),
            }
        })
    }
}

impl ImageStore for MemoryBackend {
    fn upload_image(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> ServiceFuture<'_, ImageUploadResponse> {
        Box::pin(async move {
            if bytes.is_empty() {
                return Err(status(Endpoint::UploadImage, 400, "Empty file"));
            }
            let mut state = self.state.lock().await;
            let image_id = state.allocate_id();
            state.images.insert(image_id.clone(), (file_name.clone(), bytes));
            Ok(ImageUploadResponse {
                image_id,
                filename: file_name,
                message: "Image uploaded successfully".to_owned(),
            })
        })
    }

    fn fetch_image(&self, image_id: String) -> ServiceFuture<'_, Vec<u8>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            state
                .images
                .get(&image_id)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| status(Endpoint::FetchImage, 404, "Image not found"))
        })
    }
}

impl Pathfinder for MemoryBackend {
    fn find_path(&self, request: PathRequest) -> ServiceFuture<'_, PathResponse> {
        Box::pin(async move {
            let grid = {
                let state = self.state.lock().await;
                find_grid(&state, Endpoint::FindPath, &request.grid_id)?.clone()
            };
            check_route_point(&grid, request.start.into(), "start")?;
            check_route_point(&grid, request.end.into(), "end")?;
            for &pickup in &request.pickup_points {
                check_route_point(&grid, pickup.into(), "pickup")?;
            }
            match &self.responder {
                Some(responder) => responder(&request, &grid),
                None => Err(ServiceError::Unavailable {
                    endpoint: Endpoint::FindPath,
                    reason: "pathfinding needs a server (offline mode)".to_owned(),
                }),
            }
        })
    }
}

impl ProductStore for MemoryBackend {
    fn save_product(&self, product: ProductPayload) -> ServiceFuture<'_, Confirmation> {
        Box::pin(async move {
            let endpoint = Endpoint::SaveProduct;
            let mut state = self.state.lock().await;
            let grid = find_grid(&state, endpoint, &product.grid_id)?;
            if product.x_coord >= grid.rows || product.y_coord >= grid.columns {
                return Err(status(
                    endpoint,
                    400,
                    format!(
                        "Coordinates ({}, {}) are outside grid bounds",
                        product.x_coord, product.y_coord
                    ),
                ));
            }
            if state.products.contains_key(&product.product_id) {
                return Err(status(endpoint, 409, "Product ID already exists"));
            }
            state.products.insert(product.product_id.clone(), product);
            Ok(Confirmation { message: "Product saved successfully".to_owned() })
        })
    }
}

impl Backend for MemoryBackend {
    fn describe(&self) -> String {
        "offline (in-memory)".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryBackend;
    use crate::model::fixtures::grid_with_wall;
    use crate::model::CellPos;
    use crate::service::types::{
        GridDocument, GridPayload, PathRequest, PathResponse, ProductPayload, WirePoint,
    };
    use crate::service::{Endpoint, GridStore, ImageStore, Pathfinder, ProductStore, ServiceError};

    fn payload() -> GridPayload {
        GridPayload::from_grid(&grid_with_wall(3, 4, &[CellPos::new(1, 1)]))
    }

    fn product(grid_id: &str, row: usize, col: usize) -> ProductPayload {
        ProductPayload {
            product_name: "Widget".to_owned(),
            product_id: "W-1".to_owned(),
            weight: 1.0,
            height: 1.0,
            width: 1.0,
            length: 1.0,
            x_coord: row,
            y_coord: col,
            grid_id: grid_id.to_owned(),
        }
    }

    #[tokio::test]
    async fn grids_round_trip_through_the_store() {
        let backend = MemoryBackend::new();
        let first = backend.save_grid(payload()).await.expect("save");
        let second = backend.save_grid(payload()).await.expect("save");
        assert_eq!(first.id.len(), 24);
        assert_ne!(first.id, second.id);

        let listed = backend.list_grids().await.expect("list");
        assert_eq!(listed.iter().map(|doc| doc.id.as_str()).collect::<Vec<_>>(), [
            second.id.as_str(),
            first.id.as_str()
        ]);

        let loaded = backend.load_grid(first.id.clone()).await.expect("load");
        assert!(loaded.to_grid().expect("grid").is_obstacle(CellPos::new(1, 1)));

        backend.delete_grid(first.id.clone()).await.expect("delete");
        let err = backend.load_grid(first.id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn malformed_grids_are_rejected() {
        let backend = MemoryBackend::new();
        let mut bad = payload();
        bad.grid[0].push(0);
        let err = backend.save_grid(bad).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(backend.list_grids().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn pathfinding_without_responder_is_unavailable() {
        let backend = MemoryBackend::new();
        let doc = backend.save_grid(payload()).await.expect("save");
        let request = PathRequest {
            grid_id: doc.id,
            start: WirePoint { x: 0, y: 0 },
            end: WirePoint { x: 2, y: 3 },
            pickup_points: Vec::new(),
            algorithm: "optimal".to_owned(),
        };
        let err = backend.find_path(request.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { endpoint: Endpoint::FindPath, .. }));

        let mut blocked = request;
        blocked.end = WirePoint { x: 1, y: 1 };
        assert_eq!(backend.find_path(blocked).await.unwrap_err().status(), Some(400));
    }

    #[tokio::test]
    async fn responder_answers_path_requests() {
        let backend = MemoryBackend::new().with_path_responder(Box::new(|request: &PathRequest, _grid: &GridDocument| {
            Ok(PathResponse {
                path: vec![request.start, request.end],
                total_distance: Some(1.0),
                computation_time: None,
                algorithm_used: Some(request.algorithm.clone()),
            })
        }));
        let doc = backend.save_grid(payload()).await.expect("save");
        let response = backend
            .find_path(PathRequest {
                grid_id: doc.id,
                start: WirePoint { x: 0, y: 0 },
                end: WirePoint { x: 0, y: 1 },
                pickup_points: Vec::new(),
                algorithm: "optimal".to_owned(),
            })
            .await
            .expect("path");
        assert_eq!(response.path.len(), 2);
    }

    #[tokio::test]
    async fn products_are_bounds_checked_and_unique() {
        let backend = MemoryBackend::new();
        let doc = backend.save_grid(payload()).await.expect("save");

        let err = backend.save_product(product(&doc.id, 3, 0)).await.unwrap_err();
        assert_eq!(err.status(), Some(400));

        backend.save_product(product(&doc.id, 2, 3)).await.expect("save product");
        assert!(backend.product("W-1").await.is_some());
        let err = backend.save_product(product(&doc.id, 0, 0)).await.unwrap_err();
        assert_eq!(err.status(), Some(409));

        let err = backend.save_product(product("missing", 0, 0)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn images_are_stored_by_id() {
        let backend = MemoryBackend::new();
        let uploaded = backend.upload_image("plan.png".to_owned(), vec![1, 2, 3]).await.expect("upload");
        assert_eq!(uploaded.filename, "plan.png");
        assert_eq!(backend.fetch_image(uploaded.image_id).await.expect("fetch"), vec![1, 2, 3]);
        assert_eq!(backend.fetch_image("nope".to_owned()).await.unwrap_err().status(), Some(404));
    }
}
