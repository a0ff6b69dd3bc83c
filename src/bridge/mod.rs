// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription bridge.
//!
//! A [`Bridge`] keeps a callback attached to a [`Source`](crate::source::Source)
//! for as long as the owning scope is alive and the source identity is
//! unchanged.
//!
//! # Lifecycle
//!
//! ```text
//!             activate(Some(S))               activate(Some(S'))
//!  Detached ───────────────────► Attached(S) ──────────────────► Detached ─► Attached(S')
//!     ▲                              │
//!     └──── activate(None) / detach / unmount / drop
//! ```
//!
//! A bridge holds at most one subscription. Switching sources always
//! releases the old subscription before creating the new one. Detaching
//! waits for a delivery that is already inside the callback, so nothing
//! reaches the callback after detach returns.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use subbridge::Bridge;
//! use subbridge::source::Subject;
//!
//! let first = Subject::<u32>::new();
//! let second = Subject::<u32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut bridge = Bridge::<u32>::new();
//!
//! let sink = Arc::clone(&seen);
//! bridge.activate(Some(&first), move |v: &u32| sink.lock().push(*v))?;
//! first.emit(&1);
//!
//! // New identity: detach from `first`, attach to `second`.
//! let sink = Arc::clone(&seen);
//! bridge.activate(Some(&second), move |v: &u32| sink.lock().push(*v))?;
//! first.emit(&99);
//! second.emit(&2);
//!
//! assert_eq!(*seen.lock(), vec![1, 2]);
//! # Ok::<(), subbridge::Error>(())
//! ```

mod lifecycle;
mod state;

pub use lifecycle::Bridge;
pub use state::{BridgeState, BridgeStats};
