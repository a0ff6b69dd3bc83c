// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `subbridge` - bind push-based sources to the lifecycle of an owning scope.
//!
//! An owning scope (a UI component instance, a session, a worker) often
//! wants to react to values from a stream for exactly as long as it is
//! alive, and to follow the stream when it is swapped for another one. The
//! [`Bridge`] does that bookkeeping:
//!
//! - **Attach** on first activation, and again whenever the source identity
//!   changes
//! - **Detach** before every re-attach, and exactly once when the scope ends
//! - **Latest callback**: values always go to the callback supplied on the
//!   most recent activation, without re-subscribing
//!
//! # Building blocks
//!
//! - [`source`] - the [`Source`](source::Source) trait, plus
//!   [`Subject`](source::Subject) (synchronous) and
//!   [`BroadcastSource`](source::BroadcastSource) (tokio broadcast)
//! - [`effect`] - dependency-keyed setup/cleanup slots
//! - [`LatestRef`] - a cell that always holds the newest value
//! - [`subscription`] - callback registry shared by sources
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use subbridge::Bridge;
//! use subbridge::source::Subject;
//!
//! let prices = Subject::<f64>::new();
//! let last = Arc::new(Mutex::new(None));
//! let mut bridge = Bridge::<f64>::new();
//!
//! // Mount.
//! let sink = Arc::clone(&last);
//! bridge.activate(Some(&prices), move |p: &f64| *sink.lock() = Some(*p))?;
//! prices.emit(&101.5);
//!
//! // Update with a new callback: no re-subscription.
//! let sink = Arc::clone(&last);
//! bridge.activate(Some(&prices), move |p: &f64| *sink.lock() = Some(p * 2.0))?;
//! prices.emit(&10.0);
//! assert_eq!(*last.lock(), Some(20.0));
//! assert_eq!(bridge.stats().attaches, 1);
//!
//! // Unmount.
//! bridge.unmount();
//! assert_eq!(prices.subscriber_count(), 0);
//! # Ok::<(), subbridge::Error>(())
//! ```
//!
//! # Failure handling
//!
//! A source that fails to subscribe makes [`Bridge::activate`] return the
//! error by default. [`SubscribeErrorPolicy::Log`] logs it instead and keeps
//! the bridge detached; either way the next activation retries.

pub mod bridge;
mod config;
pub mod effect;
pub mod error;
mod latest;
pub mod source;
pub mod subscription;

pub use bridge::{Bridge, BridgeState, BridgeStats};
pub use config::{BridgeConfig, SubscribeErrorPolicy};
pub use error::{Error, Result, SourceError};
pub use latest::LatestRef;
pub use source::{BroadcastSource, Source, SourceId, Subject, SubscriptionHandle};
pub use subscription::{CallbackRegistry, SubscriptionId};
