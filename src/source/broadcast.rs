// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source backed by a tokio broadcast channel.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::{Emit, Source, SourceId, SubscriptionHandle};
use crate::error::SourceError;

/// Default channel capacity for a broadcast source.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A source that fans values out through `tokio::sync::broadcast`.
///
/// Each subscription owns a broadcast receiver and a forwarding task that
/// calls the subscriber's callback for every received value. Delivery is
/// therefore asynchronous relative to [`publish`](Self::publish).
///
/// # Capacity
///
/// The channel has a fixed capacity (default 256). A subscriber that falls
/// behind loses the oldest values; the loss is logged and forwarding
/// continues with the newest ones.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use subbridge::source::{BroadcastSource, Source};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), subbridge::error::SourceError> {
/// let source = BroadcastSource::<u32>::new();
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
///
/// let handle = source.subscribe(Arc::new(move |v: &u32| {
///     let _ = tx.send(*v);
/// }))?;
///
/// source.publish(7);
/// assert_eq!(rx.recv().await, Some(7));
/// handle.unsubscribe();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BroadcastSource<T> {
    sender: broadcast::Sender<T>,
    id: SourceId,
}

impl<T: Clone + Send + 'static> BroadcastSource<T> {
    /// Creates a broadcast source with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a broadcast source with the specified capacity.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            id: SourceId::new(),
        }
    }

    /// Publishes a value and returns the number of receivers it was queued for.
    ///
    /// Returns 0 if there are no subscribers; the value is discarded.
    pub fn publish(&self, value: T) -> usize {
        self.sender.send(value).unwrap_or(0)
    }

    /// Returns the number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Identity of this source.
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }
}

impl<T: Clone + Send + 'static> Default for BroadcastSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BroadcastSource<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            id: self.id,
        }
    }
}

impl<T: Clone + Send + 'static> Source<T> for BroadcastSource<T> {
    fn id(&self) -> SourceId {
        self.id
    }

    /// Subscribes on the current tokio runtime.
    ///
    /// The receiver is created before this returns, so every value published
    /// afterwards is seen by the new subscriber.
    fn subscribe(&self, emit: Emit<T>) -> Result<Box<dyn SubscriptionHandle>, SourceError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SourceError::NoRuntime)?;
        let mut receiver = self.sender.subscribe();
        let source = self.id;

        let task = runtime.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(value) => emit(&value),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            source = %source,
                            skipped,
                            "Subscriber lagged, values dropped"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::trace!(source = %source, "Broadcast channel closed, forwarding stopped");
        });

        Ok(Box::new(BroadcastSubscription { task }))
    }
}

struct BroadcastSubscription {
    task: JoinHandle<()>,
}

impl SubscriptionHandle for BroadcastSubscription {
    fn unsubscribe(self: Box<Self>) {
        self.task.abort();
    }
}
