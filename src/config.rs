// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration loaded from `floorgrid.toml`.
//!
//! Lookup order: an explicit path, the executable's directory, then the working directory.
//! Missing files fall back to built-in defaults; every section and field is optional.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::RenderSpeed;

pub const CONFIG_FILE_NAME: &str = "floorgrid.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub service: ServiceConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub editor: EditorConfig,
    pub image: ImageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub offline: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8000".to_owned(), timeout_ms: 10_000, offline: false }
    }
}

/// Cell sizing bounds for the layout engine, in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub min_cell_size: u32,
    pub max_cell_size: u32,
    pub default_cell_size: u32,
    pub dense_grid_threshold: usize,
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub resize_debounce_ms: u64,
    pub glyph_width_px: u32,
    pub glyph_height_px: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_cell_size: 8,
            max_cell_size: 40,
            default_cell_size: 20,
            dense_grid_threshold: 50,
            zoom_step: 0.25,
            min_zoom: 0.25,
            max_zoom: 4.0,
            resize_debounce_ms: 150,
            glyph_width_px: 8,
            glyph_height_px: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub speed: RenderSpeed,
    pub batch_size: usize,
    pub tick_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { speed: RenderSpeed::Animated, batch_size: 25, tick_ms: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub max_manual_dimension: usize,
    pub max_pickup_points: usize,
    pub default_width_m: f64,
    pub default_length_m: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_manual_dimension: 100,
            max_pickup_points: 50,
            default_width_m: 10.0,
            default_length_m: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub cell_budget: u64,
    pub meters_per_pixel: f64,
    pub max_upload_bytes: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { cell_budget: 5000, meters_per_pixel: 0.01, max_upload_bytes: 10 * 1024 * 1024 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: PathBuf::from("floorgrid.log"), level: "info".to_owned() }
    }
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound { path: path.to_path_buf() });
            }
            return Self::load_from_path(path);
        }

        for candidate in candidate_paths() {
            if candidate.is_file() {
                return Self::load_from_path(&candidate);
            }
        }

        tracing::debug!("no {CONFIG_FILE_NAME} found; using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => {
                ConfigError::Parse { path: Some(path.to_path_buf()), source }
            }
            other => other,
        })?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|source| ConfigError::Parse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.min_cell_size == 0 {
            return Err(invalid("layout.min_cell_size", "must be at least 1"));
        }
        if layout.max_cell_size < layout.min_cell_size {
            return Err(invalid("layout.max_cell_size", "must not be below min_cell_size"));
        }
        if layout.default_cell_size == 0 {
            return Err(invalid("layout.default_cell_size", "must be at least 1"));
        }
        if !(layout.min_zoom > 0.0 && layout.min_zoom <= 1.0 && layout.max_zoom >= 1.0) {
            return Err(invalid("layout.min_zoom", "zoom range must be positive and include 1.0"));
        }
        if !(layout.zoom_step > 0.0) {
            return Err(invalid("layout.zoom_step", "must be positive"));
        }
        if layout.glyph_width_px == 0 || layout.glyph_height_px == 0 {
            return Err(invalid("layout.glyph_width_px", "glyph size must be non-zero"));
        }
        if self.render.batch_size == 0 {
            return Err(invalid("render.batch_size", "must be at least 1"));
        }
        if self.editor.max_manual_dimension == 0
            || self.editor.max_manual_dimension > crate::model::MAX_DIMENSION
        {
            return Err(invalid("editor.max_manual_dimension", "must be between 1 and 1000"));
        }
        if !(self.editor.default_width_m > 0.0 && self.editor.default_length_m > 0.0) {
            return Err(invalid("editor.default_width_m", "default extents must be positive"));
        }
        if self.image.cell_budget == 0 {
            return Err(invalid("image.cell_budget", "must be at least 1"));
        }
        if !(self.image.meters_per_pixel > 0.0) {
            return Err(invalid("image.meters_per_pixel", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_owned() }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }
    paths
}

#[derive(Debug)]
pub enum ConfigError {
    NotFound { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
    Parse { path: Option<PathBuf>, source: toml::de::Error },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "config file not found: {}", path.display()),
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse { path: Some(path), source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            Self::Parse { path: None, source } => write!(f, "failed to parse config: {source}"),
            Self::Invalid { field, reason } => write!(f, "invalid config value {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
