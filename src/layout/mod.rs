// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Responsive grid layout.
//!
//! This module turns container size, zoom and layout mode into square cell geometry, debounces
//! resize bursts, and projects the result onto a scrollable terminal viewport for drawing and
//! pointer hit-testing.

mod debounce;
mod display;
mod engine;
mod viewport;
mod zoom;

pub use debounce::ResizeDebouncer;
pub use display::{
    aspect_behavior, compute_display_settings, AspectBehavior, ContainerSize, DisplaySettings,
    LayoutInput, LayoutMode,
};
pub use engine::LayoutEngine;
pub use viewport::{GlyphMetrics, Viewport};
pub use zoom::Zoom;
