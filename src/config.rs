// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a bridge does when a source fails to subscribe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeErrorPolicy {
    /// Return the error from [`Bridge::activate`](crate::Bridge::activate).
    #[default]
    Propagate,
    /// Log the error at `warn` level and stay detached.
    Log,
}

/// Configuration for a [`Bridge`](crate::Bridge).
///
/// # Examples
///
/// ```
/// use subbridge::{BridgeConfig, SubscribeErrorPolicy};
///
/// let config = BridgeConfig::default()
///     .with_label("price-ticker")
///     .with_subscribe_error(SubscribeErrorPolicy::Log);
///
/// let parsed = BridgeConfig::from_json(r#"{"label":"price-ticker","subscribe_error":"log"}"#)?;
/// assert_eq!(parsed, config);
/// # Ok::<(), subbridge::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Optional label attached to the bridge's log events.
    pub label: Option<String>,
    /// Handling of subscribe failures.
    pub subscribe_error: SubscribeErrorPolicy,
}

impl BridgeConfig {
    /// Sets the log label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the subscribe failure policy.
    #[must_use]
    pub fn with_subscribe_error(mut self, policy: SubscribeErrorPolicy) -> Self {
        self.subscribe_error = policy;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the JSON is malformed
    /// or names an unknown policy.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
