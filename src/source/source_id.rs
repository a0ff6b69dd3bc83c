// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source identity type.

use std::fmt;

use uuid::Uuid;

/// Identity of a source instance.
///
/// Every independently created source gets a fresh UUID v4, so two sources
/// are distinct even when they would emit identical values. Handles that
/// share one underlying stream (a cloned [`Subject`](super::Subject), for
/// instance) share the identity.
///
/// # Examples
///
/// ```
/// use subbridge::source::SourceId;
///
/// let a = SourceId::new();
/// let b = SourceId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(Uuid);

impl SourceId {
    /// Creates a new unique source identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First UUID field only; enough to tell sources apart in logs.
        let (head, ..) = self.0.as_fields();
        write!(f, "SourceId({head:08x})")
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SourceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
