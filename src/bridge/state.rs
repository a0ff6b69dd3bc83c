// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge state and counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::source::SourceId;

/// Attachment state of a [`Bridge`](super::Bridge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// No subscription is held.
    #[default]
    Detached,
    /// A subscription to the given source is held.
    Attached(SourceId),
}

impl BridgeState {
    /// Returns the attached source, if any.
    #[must_use]
    pub fn source(&self) -> Option<SourceId> {
        match self {
            Self::Detached => None,
            Self::Attached(id) => Some(*id),
        }
    }

    /// Returns `true` in the `Attached` state.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => write!(f, "detached"),
            Self::Attached(id) => write!(f, "attached({id})"),
        }
    }
}

/// Snapshot of a bridge's lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Subscriptions created.
    pub attaches: u64,
    /// Subscriptions released.
    pub detaches: u64,
    /// Values handed to the callback.
    pub deliveries: u64,
}

impl BridgeStats {
    /// Number of subscriptions currently held (0 or 1).
    #[must_use]
    pub fn active(&self) -> u64 {
        self.attaches - self.detaches
    }
}

/// Shared counters; written from delivery and cleanup paths.
#[derive(Debug, Default)]
pub(crate) struct StatsCell {
    attaches: AtomicU64,
    detaches: AtomicU64,
    deliveries: AtomicU64,
}

impl StatsCell {
    pub(crate) fn record_attach(&self) {
        self.attaches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_detach(&self) {
        self.detaches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> BridgeStats {
        BridgeStats {
            attaches: self.attaches.load(Ordering::Relaxed),
            detaches: self.detaches.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}
