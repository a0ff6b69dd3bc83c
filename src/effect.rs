// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dependency-keyed setup and cleanup.
//!
//! An [`Effect`] runs its setup on first activation and again whenever the
//! dependency value changes. The cleanup returned by the previous setup
//! always runs before the next setup, and once more on
//! [`teardown`](Effect::teardown) or drop.
//!
//! ```
//! use subbridge::effect::Effect;
//!
//! let mut effect = Effect::new();
//!
//! // First activation runs setup.
//! let ran = effect.run(1, || Ok::<_, ()>(None))?;
//! assert!(ran);
//!
//! // Same dependency: nothing happens.
//! assert!(!effect.run(1, || Ok::<_, ()>(None))?);
//! # Ok::<(), ()>(())
//! ```

/// Cleanup returned by an effect's setup.
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// An effect slot keyed by a dependency value `D`.
pub struct Effect<D> {
    /// Dependencies of the last successful setup; `None` means not yet run.
    deps: Option<D>,
    cleanup: Option<Cleanup>,
}

impl<D: PartialEq> Effect<D> {
    /// Creates an effect that has never run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deps: None,
            cleanup: None,
        }
    }

    /// Runs `setup` if `deps` differs from the last successful run.
    ///
    /// Any pending cleanup runs first. Returns `Ok(true)` if setup ran and
    /// `Ok(false)` if the dependencies were unchanged.
    ///
    /// # Errors
    ///
    /// Returns the setup's error. The dependencies are then left unrecorded,
    /// so the next call retries setup.
    pub fn run<E>(
        &mut self,
        deps: D,
        setup: impl FnOnce() -> Result<Option<Cleanup>, E>,
    ) -> Result<bool, E> {
        if self.deps.as_ref() == Some(&deps) {
            return Ok(false);
        }
        self.teardown();
        self.cleanup = setup()?;
        self.deps = Some(deps);
        Ok(true)
    }

    /// Runs the pending cleanup, if any, and forgets the dependencies.
    pub fn teardown(&mut self) {
        self.deps = None;
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }

    /// Returns the dependencies of the last successful setup.
    #[must_use]
    pub fn deps(&self) -> Option<&D> {
        self.deps.as_ref()
    }

    /// Returns `true` if a cleanup is pending.
    #[must_use]
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl<D: PartialEq> Default for Effect<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Drop for Effect<D> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for Effect<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("deps", &self.deps)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging_setup(log: &Log, tag: &str) -> impl FnOnce() -> Result<Option<Cleanup>, ()> {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        move || {
            log.lock().push(format!("setup {tag}"));
            let log = Arc::clone(&log);
            Ok(Some(Box::new(move || log.lock().push(format!("cleanup {tag}"))) as Cleanup))
        }
    }

    #[test]
    fn first_run_executes_setup() {
        let log = Log::default();
        let mut effect = Effect::new();

        assert_eq!(effect.run(1, logging_setup(&log, "a")), Ok(true));
        assert_eq!(*log.lock(), vec!["setup a"]);
        assert_eq!(effect.deps(), Some(&1));
    }

    #[test]
    fn unchanged_deps_skip_setup() {
        let log = Log::default();
        let mut effect = Effect::new();

        effect.run(1, logging_setup(&log, "a")).unwrap();
        assert_eq!(effect.run(1, logging_setup(&log, "b")), Ok(false));
        assert_eq!(*log.lock(), vec!["setup a"]);
    }

    #[test]
    fn changed_deps_clean_up_before_setup() {
        let log = Log::default();
        let mut effect = Effect::new();

        effect.run(1, logging_setup(&log, "a")).unwrap();
        effect.run(2, logging_setup(&log, "b")).unwrap();

        assert_eq!(*log.lock(), vec!["setup a", "cleanup a", "setup b"]);
    }

    #[test]
    fn teardown_runs_cleanup_once() {
        let log = Log::default();
        let mut effect = Effect::new();

        effect.run(1, logging_setup(&log, "a")).unwrap();
        effect.teardown();
        effect.teardown();
        drop(effect);

        assert_eq!(*log.lock(), vec!["setup a", "cleanup a"]);
    }

    #[test]
    fn drop_runs_pending_cleanup() {
        let log = Log::default();
        {
            let mut effect = Effect::new();
            effect.run(1, logging_setup(&log, "a")).unwrap();
        }
        assert_eq!(*log.lock(), vec!["setup a", "cleanup a"]);
    }

    #[test]
    fn failed_setup_is_retried() {
        let mut effect = Effect::new();

        assert_eq!(effect.run(1, || Err::<Option<Cleanup>, _>("boom")), Err("boom"));
        assert_eq!(effect.deps(), None);
        assert_eq!(effect.run(1, || Ok::<_, &str>(None)), Ok(true));
    }

    #[test]
    fn setup_without_cleanup() {
        let mut effect = Effect::new();
        effect.run("x", || Ok::<_, ()>(None)).unwrap();
        assert!(!effect.has_cleanup());
    }
}
