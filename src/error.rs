// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `subbridge` library.
//!
//! Failures come from two places: a [`Source`](crate::source::Source)
//! refusing a subscription, and misuse of a bridge whose owning scope has
//! already ended. Configuration parsing adds a third.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The source refused or failed to create a subscription.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The owning scope has ended; the bridge no longer attaches.
    #[error("owning scope has ended")]
    ScopeEnded,

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors raised by a source while subscribing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source was closed and accepts no new subscribers.
    #[error("source is closed")]
    Closed,

    /// The source needs an async runtime to forward values and none is running.
    #[error("no async runtime available to drive the subscription")]
    NoRuntime,

    /// The source rejected the subscription for an implementation-specific reason.
    #[error("subscription rejected: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
