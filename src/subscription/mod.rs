// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback bookkeeping for sources.
//!
//! - [`SubscriptionId`] - A unique identifier for a registered callback
//! - [`CallbackRegistry`] - Ordered registry that stores callbacks and hands
//!   out snapshots for dispatch
//!
//! [`Subject`](crate::source::Subject) is built on the registry; custom
//! [`Source`](crate::source::Source) implementations can reuse it the same way.
//!
//! ```
//! use std::sync::Arc;
//! use subbridge::subscription::CallbackRegistry;
//!
//! let registry = CallbackRegistry::<u32>::new();
//! let id = registry.register(Arc::new(|value: &u32| println!("got {value}")));
//!
//! for callback in registry.snapshot() {
//!     callback(&7);
//! }
//!
//! assert!(registry.unsubscribe(id));
//! ```

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
