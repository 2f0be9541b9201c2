// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::render::CellMark;

pub(crate) const CELL_COLORS_ENV: &str = "FLOORGRID_CELL_COLORS";

/// Background colors per cell mark, optionally overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    start: Color,
    end: Color,
    pickup: Color,
    path: Color,
    obstacle: Color,
    walkable: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self {
            start: Color::Green,
            end: Color::Red,
            pickup: Color::Blue,
            path: Color::Yellow,
            obstacle: Color::DarkGray,
            walkable: Color::Reset,
        }
    }
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(CELL_COLORS_ENV) {
            Ok(value) => Self::default().with_overrides(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: CELL_COLORS_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    /// Applies `mark=color` pairs separated by commas, e.g. `path=#ffaa00,obstacle=gray`.
    pub(crate) fn with_overrides(mut self, spec: &str) -> Result<Self, ThemeError> {
        for entry in spec.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let invalid = |reason: String| ThemeError::InvalidEnv {
                name: CELL_COLORS_ENV.to_owned(),
                value: format!("{entry} ({reason})"),
            };
            let (mark, color) =
                entry.split_once('=').ok_or_else(|| invalid("expected mark=color".to_owned()))?;
            let color = parse_color(color).map_err(invalid)?;
            let slot = match mark.trim().to_ascii_lowercase().as_str() {
                "start" => &mut self.start,
                "end" => &mut self.end,
                "pickup" => &mut self.pickup,
                "path" => &mut self.path,
                "obstacle" => &mut self.obstacle,
                "walkable" => &mut self.walkable,
                other => return Err(invalid(format!("unknown mark {other:?}"))),
            };
            *slot = color;
        }
        Ok(self)
    }

    pub(crate) fn cell_color(&self, mark: CellMark) -> Color {
        match mark {
            CellMark::Start => self.start,
            CellMark::End => self.end,
            CellMark::Pickup => self.pickup,
            CellMark::Path => self.path,
            CellMark::Obstacle => self.obstacle,
            CellMark::Walkable => self.walkable,
        }
    }

    pub(crate) fn cell_style(&self, mark: CellMark) -> Style {
        let style = Style::default().bg(self.cell_color(mark));
        match mark {
            CellMark::Start | CellMark::End | CellMark::Pickup => {
                style.fg(Color::White).add_modifier(Modifier::BOLD)
            }
            CellMark::Path => style.fg(Color::Black),
            CellMark::Obstacle => style.fg(Color::Gray),
            CellMark::Walkable => style.fg(Color::DarkGray),
        }
    }
}

fn parse_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let named = match trimmed.to_ascii_lowercase().as_str() {
        "reset" | "default" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid color: {trimmed} (expected a name or #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
