// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Clients for the remote grid, image, pathfinding and product services.
//!
//! The editor never talks to a backend directly: the [`dispatch::RequestDispatcher`] runs calls
//! on the tokio runtime and hands replies back to the UI loop over a channel.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

pub mod dispatch;
pub mod http;
pub mod memory;
pub mod types;

pub use dispatch::{RequestDispatcher, ServiceReply, ServiceResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use types::{
    Confirmation, ErrorPayload, GridDocument, GridPayload, GridSummary, ImageDataResponse,
    ImageUploadResponse, PathRequest, PathResponse, ProductPayload, WirePoint,
};

pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    SaveGrid,
    ListGrids,
    LoadGrid,
    DeleteGrid,
    UploadImage,
    FetchImage,
    FindPath,
    SaveProduct,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SaveGrid => "save grid",
            Self::ListGrids => "list grids",
            Self::LoadGrid => "load grid",
            Self::DeleteGrid => "delete grid",
            Self::UploadImage => "upload image",
            Self::FetchImage => "fetch image",
            Self::FindPath => "find path",
            Self::SaveProduct => "save product",
        })
    }
}

pub trait GridStore: Send + Sync {
    fn save_grid(&self, payload: GridPayload) -> ServiceFuture<'_, GridDocument>;
    fn list_grids(&self) -> ServiceFuture<'_, Vec<GridDocument>>;
    fn load_grid(&self, grid_id: String) -> ServiceFuture<'_, GridDocument>;
    fn delete_grid(&self, grid_id: String) -> ServiceFuture<'_, Confirmation>;
}

pub trait ImageStore: Send + Sync {
    fn upload_image(&self, file_name: String, bytes: Vec<u8>)
        -> ServiceFuture<'_, ImageUploadResponse>;
    fn fetch_image(&self, image_id: String) -> ServiceFuture<'_, Vec<u8>>;
}

pub trait Pathfinder: Send + Sync {
    fn find_path(&self, request: PathRequest) -> ServiceFuture<'_, PathResponse>;
}

pub trait ProductStore: Send + Sync {
    fn save_product(&self, product: ProductPayload) -> ServiceFuture<'_, Confirmation>;
}

/// Everything the editor needs from the outside world.
pub trait Backend: GridStore + ImageStore + Pathfinder + ProductStore {
    /// Short human-readable description for the status line.
    fn describe(&self) -> String;
}

#[derive(Debug)]
pub enum ServiceError {
    InvalidUrl { url: String, reason: &'static str },
    Transport { endpoint: Endpoint, source: io::Error },
    Timeout { endpoint: Endpoint, after: Duration },
    Status { endpoint: Endpoint, status: u16, detail: String },
    Decode { endpoint: Endpoint, reason: String },
    Unavailable { endpoint: Endpoint, reason: String },
}

impl ServiceError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::InvalidUrl { .. } => None,
            Self::Transport { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Unavailable { endpoint, .. } => Some(*endpoint),
        }
    }

    /// Transport failures and timeouts may succeed when retried; other errors will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => write!(f, "invalid service url {url:?}: {reason}"),
            Self::Transport { endpoint, source } => write!(f, "{endpoint} failed: {source}"),
            Self::Timeout { endpoint, after } => {
                write!(f, "{endpoint} timed out after {} ms", after.as_millis())
            }
            Self::Status { endpoint, status, detail } if detail.is_empty() => {
                write!(f, "{endpoint} failed with HTTP {status}")
            }
            Self::Status { endpoint, status, detail } => {
                write!(f, "{endpoint} failed with HTTP {status}: {detail}")
            }
            Self::Decode { endpoint, reason } => {
                write!(f, "{endpoint} returned an unreadable response: {reason}")
            }
            Self::Unavailable { endpoint, reason } => write!(f, "{endpoint} unavailable: {reason}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
