// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The subscription bridge.

use std::sync::Arc;

use parking_lot::RwLock;

use super::state::{BridgeState, BridgeStats, StatsCell};
use crate::config::{BridgeConfig, SubscribeErrorPolicy};
use crate::effect::{Cleanup, Effect};
use crate::error::{Error, Result};
use crate::latest::LatestRef;
use crate::source::{Emit, Source, SourceId};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Binds a source to the lifecycle of an owning scope.
///
/// The owning scope calls [`activate`](Self::activate) on every effect pass
/// (mount and each update) with the current source and callback, and
/// [`unmount`](Self::unmount) when it ends. Dropping the bridge also ends
/// the scope.
///
/// - The source is re-subscribed only when its [`SourceId`] changes. The
///   old subscription is always released before the new one is created.
/// - Values are always delivered to the callback passed to the most recent
///   `activate`, without re-subscribing.
/// - Once detach returns, no further values reach the callback. A delivery
///   already running on another thread is waited for, so detaching from
///   inside the callback itself would deadlock.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use subbridge::Bridge;
/// use subbridge::source::Subject;
///
/// let ticks = Subject::<u32>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut bridge = Bridge::<u32>::new();
///
/// let sink = Arc::clone(&seen);
/// bridge.activate(Some(&ticks), move |v: &u32| sink.lock().push(*v))?;
/// ticks.emit(&1);
///
/// bridge.unmount();
/// ticks.emit(&2);
///
/// assert_eq!(*seen.lock(), vec![1]);
/// # Ok::<(), subbridge::Error>(())
/// ```
pub struct Bridge<T> {
    config: BridgeConfig,
    callback: LatestRef<Callback<T>>,
    effect: Effect<Option<SourceId>>,
    state: BridgeState,
    stats: Arc<StatsCell>,
    ended: bool,
}

impl<T: 'static> Bridge<T> {
    /// Creates a detached bridge with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Creates a detached bridge with the given configuration.
    #[must_use]
    pub fn with_config(config: BridgeConfig) -> Self {
        let noop: Callback<T> = Arc::new(|_: &T| {});
        Self {
            config,
            callback: LatestRef::new(noop),
            effect: Effect::new(),
            state: BridgeState::Detached,
            stats: Arc::new(StatsCell::default()),
            ended: false,
        }
    }

    /// Runs one effect pass of the owning scope.
    ///
    /// Stores `callback` as the latest callback, then re-subscribes if the
    /// identity of `source` differs from the previous pass. An absent source
    /// holds no subscription.
    ///
    /// # Errors
    ///
    /// - [`Error::ScopeEnded`] after [`unmount`](Self::unmount)
    /// - [`Error::Source`] if subscribing fails and the policy is
    ///   [`SubscribeErrorPolicy::Propagate`]. The bridge stays detached and
    ///   the next pass retries.
    pub fn activate<F>(&mut self, source: Option<&dyn Source<T>>, callback: F) -> Result<()>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if self.ended {
            return Err(Error::ScopeEnded);
        }
        self.callback.set(Arc::new(callback));

        let deps = source.map(|s| s.id());
        let Self {
            config,
            callback: latest,
            effect,
            state,
            stats,
            ..
        } = self;
        let label = config.label.as_deref();

        match effect.run(deps, || attach(source, latest, stats, label)) {
            Ok(false) => {
                tracing::trace!(bridge = label, state = %state, "Callback replaced");
                Ok(())
            }
            Ok(true) => {
                *state = deps.map_or(BridgeState::Detached, BridgeState::Attached);
                Ok(())
            }
            Err(err) => {
                *state = BridgeState::Detached;
                match config.subscribe_error {
                    SubscribeErrorPolicy::Propagate => Err(err),
                    SubscribeErrorPolicy::Log => {
                        tracing::warn!(
                            bridge = label,
                            source = ?deps,
                            error = %err,
                            "Subscribe failed, staying detached"
                        );
                        Ok(())
                    }
                }
            }
        }
    }

    /// Releases the current subscription without ending the scope.
    ///
    /// The next [`activate`](Self::activate) subscribes again, even to the
    /// same source. A no-op when nothing is attached.
    pub fn detach(&mut self) {
        self.effect.teardown();
        self.state = BridgeState::Detached;
    }

    /// Ends the owning scope.
    ///
    /// Releases the subscription exactly once; later calls do nothing and
    /// later activations fail with [`Error::ScopeEnded`].
    pub fn unmount(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.detach();
        tracing::debug!(bridge = self.config.label.as_deref(), "Scope ended");
    }
}

impl<T> Bridge<T> {
    /// Current attachment state.
    #[must_use]
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Returns `true` while a subscription is held.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    /// Identity of the attached source, if any.
    #[must_use]
    pub fn attached_source(&self) -> Option<SourceId> {
        self.state.source()
    }

    /// Returns `true` once the owning scope has ended.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> BridgeStats {
        self.stats.snapshot()
    }

    /// The bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl<T: 'static> Default for Bridge<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Bridge<T> {
    fn drop(&mut self) {
        if !self.ended {
            self.ended = true;
            // Effect's own drop releases the subscription.
            tracing::debug!(bridge = self.config.label.as_deref(), "Scope dropped");
        }
    }
}

impl<T> std::fmt::Debug for Bridge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("label", &self.config.label)
            .field("state", &self.state)
            .field("ended", &self.ended)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

/// Subscribes to `source` with a dispatch closure that reads the latest
/// callback at delivery time. Returns the cleanup that detaches it.
fn attach<T: 'static>(
    source: Option<&dyn Source<T>>,
    callback: &LatestRef<Callback<T>>,
    stats: &Arc<StatsCell>,
    label: Option<&str>,
) -> Result<Option<Cleanup>> {
    let Some(source) = source else {
        return Ok(None);
    };
    let id = source.id();
    let live = Arc::new(RwLock::new(true));

    let emit: Emit<T> = {
        let latest = callback.clone();
        let live = Arc::clone(&live);
        let stats = Arc::clone(stats);
        Arc::new(move |value: &T| {
            // Recursive: the callback may re-enter its own source.
            let open = live.read_recursive();
            if !*open {
                return;
            }
            let current = latest.get();
            stats.record_delivery();
            current(value);
        })
    };

    let handle = source.subscribe(emit)?;
    stats.record_attach();
    tracing::debug!(bridge = label, source = %id, "Attached");

    let stats = Arc::clone(stats);
    let label = label.map(str::to_owned);
    Ok(Some(Box::new(move || {
        // Blocks until a running delivery leaves the callback.
        *live.write() = false;
        handle.unsubscribe();
        stats.record_detach();
        tracing::debug!(bridge = label.as_deref(), source = %id, "Detached");
    })))
}
