// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronous in-process source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::{Emit, Source, SourceId, SubscriptionHandle};
use crate::error::SourceError;
use crate::subscription::{CallbackRegistry, SubscriptionId};

struct SubjectInner<T> {
    id: SourceId,
    registry: CallbackRegistry<T>,
    closed: AtomicBool,
}

/// A hot, synchronous emitter.
///
/// [`emit`](Self::emit) calls every current subscriber inline, in
/// registration order, before returning. Values emitted while nobody is
/// subscribed are dropped.
///
/// Cloning a `Subject` creates a new handle to the **same** stream: both
/// handles share subscribers and report the same [`SourceId`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use subbridge::source::{Source, Subject};
///
/// let subject = Subject::<i32>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let _handle = subject.subscribe(Arc::new(move |v: &i32| sink.lock().push(*v)))?;
/// subject.emit(&1);
/// subject.emit(&2);
///
/// assert_eq!(*seen.lock(), vec![1, 2]);
/// # Ok::<(), subbridge::error::SourceError>(())
/// ```
pub struct Subject<T> {
    inner: Arc<SubjectInner<T>>,
}

impl<T> Subject<T> {
    /// Creates a subject with a fresh identity and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                id: SourceId::new(),
                registry: CallbackRegistry::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Delivers `value` to every current subscriber.
    ///
    /// Returns the number of subscribers that received it; 0 once closed.
    pub fn emit(&self, value: &T) -> usize {
        if self.is_closed() {
            return 0;
        }
        let callbacks = self.inner.registry.snapshot();
        for callback in &callbacks {
            callback(value);
        }
        callbacks.len()
    }

    /// Closes the subject, dropping all subscribers.
    ///
    /// Later subscriptions fail with [`SourceError::Closed`].
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.registry.clear();
        tracing::trace!(source = %self.inner.id, "Subject closed");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.callback_count()
    }

    /// Identity of this subject.
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.inner.id
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Clone: shares the same stream without requiring `T: Clone`.
impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("id", &self.inner.id)
            .field("subscriber_count", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T: 'static> Source<T> for Subject<T> {
    fn id(&self) -> SourceId {
        self.inner.id
    }

    fn subscribe(&self, emit: Emit<T>) -> Result<Box<dyn SubscriptionHandle>, SourceError> {
        let id = self.inner.registry.register(emit);
        // A concurrent close may have cleared the registry before we inserted.
        if self.is_closed() {
            self.inner.registry.unsubscribe(id);
            return Err(SourceError::Closed);
        }
        tracing::trace!(source = %self.inner.id, subscription = %id, "Subject subscribed");
        Ok(Box::new(SubjectSubscription {
            subject: Arc::downgrade(&self.inner),
            id,
        }))
    }
}

/// Handle returned by [`Subject`]'s [`Source::subscribe`].
///
/// Holds only a weak reference so an outstanding handle does not keep a
/// dropped subject alive.
struct SubjectSubscription<T> {
    subject: Weak<SubjectInner<T>>,
    id: SubscriptionId,
}

impl<T: 'static> SubscriptionHandle for SubjectSubscription<T> {
    fn unsubscribe(self: Box<Self>) {
        if let Some(inner) = self.subject.upgrade() {
            inner.registry.unsubscribe(self.id);
            tracing::trace!(source = %inner.id, subscription = %self.id, "Subject unsubscribed");
        }
    }
}
