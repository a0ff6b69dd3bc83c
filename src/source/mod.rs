// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push-based sources and their subscription handles.
//!
//! A [`Source`] emits values of type `T` to every attached [`Emit`]
//! callback. Subscribing returns a [`SubscriptionHandle`] that detaches the
//! callback when released. Two implementations ship with the crate:
//!
//! - [`Subject`] - synchronous, in-process; `emit` calls subscribers inline
//! - [`BroadcastSource`] - backed by a tokio broadcast channel; values are
//!   forwarded from a spawned task
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use subbridge::source::{Source, Subject};
//!
//! let subject = Subject::<u32>::new();
//! let handle = subject.subscribe(Arc::new(|v: &u32| println!("value {v}")))?;
//!
//! subject.emit(&1);
//! handle.unsubscribe();
//! assert_eq!(subject.subscriber_count(), 0);
//! # Ok::<(), subbridge::error::SourceError>(())
//! ```

mod broadcast;
mod source_id;
mod subject;

use std::sync::Arc;

use crate::error::SourceError;

pub use broadcast::BroadcastSource;
pub use source_id::SourceId;
pub use subject::Subject;

/// Callback a source invokes once per emitted value.
pub type Emit<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A push-based emitter of `T` values.
pub trait Source<T>: Send + Sync {
    /// Identity of this source instance.
    fn id(&self) -> SourceId;

    /// Attaches `emit` and returns the handle that detaches it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the source cannot accept the subscription.
    fn subscribe(&self, emit: Emit<T>) -> Result<Box<dyn SubscriptionHandle>, SourceError>;
}

/// A live attachment between a source and a callback.
///
/// Releasing consumes the handle, so a handle can never be released twice.
pub trait SubscriptionHandle: Send {
    /// Detaches the callback from its source.
    fn unsubscribe(self: Box<Self>);
}

impl<T, S> Source<T> for Arc<S>
where
    S: Source<T> + ?Sized,
{
    fn id(&self) -> SourceId {
        (**self).id()
    }

    fn subscribe(&self, emit: Emit<T>) -> Result<Box<dyn SubscriptionHandle>, SourceError> {
        (**self).subscribe(emit)
    }
}
