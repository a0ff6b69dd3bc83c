// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Latest-value reference cell.

use std::sync::Arc;

use parking_lot::RwLock;

/// A shared cell that always reflects the most recently assigned value.
///
/// Clones share the same cell. Writers replace the value with
/// [`set`](Self::set); readers see the newest value on their next
/// [`get`](Self::get) or [`with`](Self::with), from any thread.
///
/// # Examples
///
/// ```
/// use subbridge::LatestRef;
///
/// let cell = LatestRef::new(1);
/// let reader = cell.clone();
///
/// cell.set(2);
/// assert_eq!(reader.get(), 2);
/// ```
pub struct LatestRef<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> LatestRef<T> {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Replaces the current value.
    pub fn set(&self, value: T) {
        *self.inner.write() = value;
    }

    /// Replaces the current value and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.inner.write(), value)
    }

    /// Runs `f` against the current value.
    ///
    /// The read lock is held while `f` runs; `f` must not call
    /// [`set`](Self::set) on the same cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<T: Clone> LatestRef<T> {
    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.read().clone()
    }
}

impl<T> Clone for LatestRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for LatestRef<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LatestRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LatestRef").field(&*self.inner.read()).finish()
    }
}
