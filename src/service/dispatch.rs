// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::types::{
    Confirmation, GridDocument, GridPayload, ImageUploadResponse, PathRequest, PathResponse,
    ProductPayload,
};
use super::{Backend, Endpoint, ServiceError};

#[derive(Debug)]
pub enum ServiceResult {
    GridSaved(Result<GridDocument, ServiceError>),
    GridsListed(Result<Vec<GridDocument>, ServiceError>),
    GridLoaded(Result<GridDocument, ServiceError>),
    GridDeleted { grid_id: String, result: Result<Confirmation, ServiceError> },
    ImageUploaded(Result<ImageUploadResponse, ServiceError>),
    ImageFetched { image_id: String, result: Result<Vec<u8>, ServiceError> },
    PathFound { route_epoch: u64, result: Result<PathResponse, ServiceError> },
    ProductSaved(Result<Confirmation, ServiceError>),
}

impl ServiceResult {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::GridSaved(_) => Endpoint::SaveGrid,
            Self::GridsListed(_) => Endpoint::ListGrids,
            Self::GridLoaded(_) => Endpoint::LoadGrid,
            Self::GridDeleted { .. } => Endpoint::DeleteGrid,
            Self::ImageUploaded(_) => Endpoint::UploadImage,
            Self::ImageFetched { .. } => Endpoint::FetchImage,
            Self::PathFound { .. } => Endpoint::FindPath,
            Self::ProductSaved(_) => Endpoint::SaveProduct,
        }
    }

    pub fn is_err(&self) -> bool {
        match self {
            Self::GridSaved(result) | Self::GridLoaded(result) => result.is_err(),
            Self::GridsListed(result) => result.is_err(),
            Self::GridDeleted { result, .. } | Self::ProductSaved(result) => result.is_err(),
            Self::ImageUploaded(result) => result.is_err(),
            Self::ImageFetched { result, .. } => result.is_err(),
            Self::PathFound { result, .. } => result.is_err(),
        }
    }
}

/// A finished call, tagged with the editor generation it was issued under.
///
/// Replies whose generation no longer matches the editor describe a grid that has since been
/// replaced and must be discarded.
#[derive(Debug)]
pub struct ServiceReply {
    pub generation: u64,
    pub result: ServiceResult,
}

/// Runs backend calls on the runtime and queues their replies for the UI loop.
pub struct RequestDispatcher {
    backend: Arc<dyn Backend>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<ServiceReply>,
    rx: mpsc::UnboundedReceiver<ServiceReply>,
    pending: BTreeMap<Endpoint, usize>,
}

impl RequestDispatcher {
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { backend, runtime, tx, rx, pending: BTreeMap::new() }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn is_pending(&self, endpoint: Endpoint) -> bool {
        self.pending.get(&endpoint).is_some_and(|&count| count > 0)
    }

    pub fn in_flight(&self) -> usize {
        self.pending.values().sum()
    }

    fn spawn(
        &mut self,
        endpoint: Endpoint,
        generation: u64,
        task: impl Future<Output = ServiceResult> + Send + 'static,
    ) {
        *self.pending.entry(endpoint).or_default() += 1;
        tracing::debug!(%endpoint, generation, "dispatching service call");
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = task.await;
            // The receiver only goes away when the UI shuts down.
            let _ = tx.send(ServiceReply { generation, result });
        });
    }

    fn settle(&mut self, reply: &ServiceReply) {
        let endpoint = reply.result.endpoint();
        if let Some(count) = self.pending.get_mut(&endpoint) {
            *count = count.saturating_sub(1);
        }
        if reply.result.is_err() {
            tracing::warn!(%endpoint, generation = reply.generation, "service call failed");
        }
    }

    pub fn save_grid(&mut self, generation: u64, payload: GridPayload) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::SaveGrid, generation, async move {
            ServiceResult::GridSaved(backend.save_grid(payload).await)
        });
    }

    pub fn list_grids(&mut self, generation: u64) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::ListGrids, generation, async move {
            ServiceResult::GridsListed(backend.list_grids().await)
        });
    }

    pub fn load_grid(&mut self, generation: u64, grid_id: String) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::LoadGrid, generation, async move {
            ServiceResult::GridLoaded(backend.load_grid(grid_id).await)
        });
    }

    pub fn delete_grid(&mut self, generation: u64, grid_id: String) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::DeleteGrid, generation, async move {
            let result = backend.delete_grid(grid_id.clone()).await;
            ServiceResult::GridDeleted { grid_id, result }
        });
    }

    pub fn upload_image(&mut self, generation: u64, file_name: String, bytes: Vec<u8>) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::UploadImage, generation, async move {
            ServiceResult::ImageUploaded(backend.upload_image(file_name, bytes).await)
        });
    }

    pub fn fetch_image(&mut self, generation: u64, image_id: String) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::FetchImage, generation, async move {
            let result = backend.fetch_image(image_id.clone()).await;
            ServiceResult::ImageFetched { image_id, result }
        });
    }

    /// The reply echoes `route_epoch` so the caller can drop paths for edited points.
    pub fn find_path(&mut self, generation: u64, route_epoch: u64, request: PathRequest) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::FindPath, generation, async move {
            let result = backend.find_path(request).await;
            ServiceResult::PathFound { route_epoch, result }
        });
    }

    pub fn save_product(&mut self, generation: u64, product: ProductPayload) {
        let backend = Arc::clone(&self.backend);
        self.spawn(Endpoint::SaveProduct, generation, async move {
            ServiceResult::ProductSaved(backend.save_product(product).await)
        });
    }

    /// Next finished reply, without waiting.
    pub fn try_recv(&mut self) -> Option<ServiceReply> {
        let reply = self.rx.try_recv().ok()?;
        self.settle(&reply);
        Some(reply)
    }

    pub fn drain(&mut self) -> Vec<ServiceReply> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Waits for the next reply.
    pub async fn recv(&mut self) -> Option<ServiceReply> {
        let reply = self.rx.recv().await?;
        self.settle(&reply);
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::runtime::Handle;

    use super::{RequestDispatcher, ServiceResult};
    use crate::model::fixtures::open_grid;
    use crate::service::types::{GridPayload, PathRequest, WirePoint};
    use crate::service::{Endpoint, MemoryBackend, ServiceError};

    #[tokio::test]
    async fn replies_carry_the_issuing_generation() {
        let mut dispatcher = RequestDispatcher::new(Arc::new(MemoryBackend::new()), Handle::current());
        dispatcher.save_grid(7, GridPayload::from_grid(&open_grid(3, 3)));
        assert!(dispatcher.is_pending(Endpoint::SaveGrid));

        let reply = dispatcher.recv().await.expect("reply");
        assert_eq!(reply.generation, 7);
        let ServiceResult::GridSaved(Ok(doc)) = reply.result else {
            panic!("expected a saved grid, got {:?}", reply.result);
        };
        assert_eq!((doc.rows, doc.columns), (3, 3));
        assert!(!dispatcher.is_pending(Endpoint::SaveGrid));
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn failures_arrive_as_replies() {
        let mut dispatcher = RequestDispatcher::new(Arc::new(MemoryBackend::new()), Handle::current());
        dispatcher.find_path(
            1,
            4,
            PathRequest {
                grid_id: "missing".to_owned(),
                start: WirePoint { x: 0, y: 0 },
                end: WirePoint { x: 1, y: 1 },
                pickup_points: Vec::new(),
                algorithm: "optimal".to_owned(),
            },
        );
        let reply = dispatcher.recv().await.expect("reply");
        assert_eq!(reply.result.endpoint(), Endpoint::FindPath);
        assert!(matches!(
            reply.result,
            ServiceResult::PathFound {
                route_epoch: 4,
                result: Err(ServiceError::Status { status: 404, .. })
            }
        ));
    }

    #[tokio::test]
    async fn try_recv_is_empty_until_a_reply_lands() {
        let mut dispatcher = RequestDispatcher::new(Arc::new(MemoryBackend::new()), Handle::current());
        assert!(dispatcher.try_recv().is_none());
        dispatcher.list_grids(0);
        let reply = dispatcher.recv().await.expect("reply");
        assert!(matches!(reply.result, ServiceResult::GridsListed(Ok(ref grids)) if grids.is_empty()));
        assert!(dispatcher.drain().is_empty());
    }
}
