// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use super::display::ContainerSize;

/// Coalesces bursts of resize notifications into one settled size.
///
/// The caller supplies `now` so tests can drive time explicitly.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<(ContainerSize, Instant)>,
    coalesced: u64,
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None, coalesced: 0 }
    }

    pub fn push(&mut self, size: ContainerSize, now: Instant) {
        if self.pending.replace((size, now)).is_some() {
            self.coalesced += 1;
        }
    }

    /// Releases the latest size once no new size arrived for a full window.
    pub fn poll(&mut self, now: Instant) -> Option<ContainerSize> {
        let (size, at) = self.pending?;
        if now.saturating_duration_since(at) < self.window {
            return None;
        }
        self.pending = None;
        Some(size)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending size settles, for sizing the event poll timeout.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|(_, at)| self.window.saturating_sub(now.saturating_duration_since(at)))
    }

    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}
