// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File-backed `tracing` setup.
//!
//! The terminal belongs to the TUI, so log lines go to the configured file without ANSI colors.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;

use crate::config::LoggingConfig;

pub fn parse_level(raw: &str) -> Result<Level, LoggingError> {
    raw.trim()
        .parse::<Level>()
        .map_err(|_| LoggingError::InvalidLevel { raw: raw.to_owned() })
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| LoggingError::Io { path: path.to_path_buf(), source })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Io { path: path.to_path_buf(), source })
}

/// Installs the global subscriber. Returns `Ok(false)` when one was already installed.
pub fn init(config: &LoggingConfig) -> Result<bool, LoggingError> {
    let level = parse_level(&config.level)?;
    let file = open_log_file(&config.file)?;
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(file = %config.file.display(), %level, "logging initialised");
    }
    Ok(installed)
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel { raw: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { raw } => {
                write!(f, "invalid log level {raw:?} (expected trace, debug, info, warn or error)")
            }
            Self::Io { path, source } => {
                write!(f, "failed to open log file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidLevel { .. } => None,
        }
    }
}
