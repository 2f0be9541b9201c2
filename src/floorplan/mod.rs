// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Floor-plan images: grid size suggestions and upload checks.
//!
//! Large images are scaled down so the suggested grid keeps roughly `cell_budget` cells while
//! preserving the aspect ratio. The real extent assumes `meters_per_pixel` for the source image.

use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::ImageReader;

use crate::config::ImageConfig;
use crate::model::{GridError, RealExtent};

pub const MIN_SUGGESTED_DIMENSION: usize = 10;
pub const MAX_SUGGESTED_DIMENSION: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSuggestion {
    pub rows: usize,
    pub columns: usize,
    /// Source pixels per cell edge before clamping; 1.0 when no downscaling was needed.
    pub scale: f64,
    pub meters_per_cell: f64,
    pub actual_width_m: f64,
    pub actual_length_m: f64,
}

impl GridSuggestion {
    pub fn extent(&self) -> Result<RealExtent, GridError> {
        RealExtent::new(self.actual_width_m, self.actual_length_m)
    }
}

pub fn suggest_grid(
    width_px: u32,
    height_px: u32,
    config: &ImageConfig,
) -> Result<GridSuggestion, ImageError> {
    if width_px == 0 || height_px == 0 {
        return Err(ImageError::Empty { width: width_px, height: height_px });
    }

    let (w, h) = (f64::from(width_px), f64::from(height_px));
    let pixels = u64::from(width_px) * u64::from(height_px);
    let scale =
        if pixels <= config.cell_budget { 1.0 } else { (pixels as f64 / config.cell_budget as f64).sqrt() };

    let clamp = |value: f64| {
        (value.round() as usize).clamp(MIN_SUGGESTED_DIMENSION, MAX_SUGGESTED_DIMENSION)
    };
    let columns = clamp(w / scale);
    let rows = clamp(h / scale);

    let meters_per_cell =
        config.meters_per_pixel * ((w / columns as f64 + h / rows as f64) / 2.0);

    Ok(GridSuggestion {
        rows,
        columns,
        scale,
        meters_per_cell,
        actual_width_m: columns as f64 * meters_per_cell,
        actual_length_m: rows as f64 * meters_per_cell,
    })
}

/// Reads `(width, height)` from encoded image bytes; the format is guessed from the content.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| ImageError::NotAnImage)?;
    if reader.format().is_none() {
        return Err(ImageError::NotAnImage);
    }
    reader.into_dimensions().map_err(ImageError::Decode)
}

/// Size limit and content check applied before anything is sent to the image store.
pub fn validate_upload(bytes: &[u8], config: &ImageConfig) -> Result<(u32, u32), ImageError> {
    if bytes.len() > config.max_upload_bytes {
        return Err(ImageError::TooLarge { size: bytes.len(), max: config.max_upload_bytes });
    }
    probe_dimensions(bytes)
}

/// A floor-plan file that passed [`validate_upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn prepare_upload(path: &Path, config: &ImageConfig) -> Result<Upload, ImageError> {
    let bytes =
        fs::read(path).map_err(|source| ImageError::Io { path: path.to_path_buf(), source })?;
    let (width, height) = validate_upload(&bytes, config)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "floorplan".to_owned());
    tracing::info!(%file_name, width, height, size = bytes.len(), "prepared image upload");
    Ok(Upload { file_name, bytes, width, height })
}

#[derive(Debug)]
pub enum ImageError {
    Empty { width: u32, height: u32 },
    TooLarge { size: usize, max: usize },
    NotAnImage,
    Decode(image::ImageError),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { width, height } => {
                write!(f, "image has no pixels ({width}x{height})")
            }
            Self::TooLarge { size, max } => {
                write!(f, "image is {size} bytes; the limit is {max} bytes")
            }
            Self::NotAnImage => f.write_str("file is not a recognized image"),
            Self::Decode(err) => write!(f, "failed to read image header: {err}"),
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
