// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the registry: handles, subscriber ids, and the subscriber error.

use alloc::string::String;

/// Identifier for a registered footnote marker.
///
/// This is a small, copyable handle minted by
/// [`Registry::register_marker`](crate::Registry::register_marker). The payload
/// is monotonic and never reused, so a handle that has been unregistered is
/// permanently dead: every identity lookup on it misses and every operation on
/// it is a safe no-op.
///
/// A handle carries no index. Its index is derived by position within the
/// registry's marker sequence at the time of the lookup.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MarkerHandle(pub(crate) u64);

/// Identifier for a registered popup content wrapper.
///
/// Same semantics as [`MarkerHandle`], minted by
/// [`Registry::register_popup`](crate::Registry::register_popup) and positioned
/// within the popup sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PopupHandle(pub(crate) u64);

/// Token identifying one subscription, returned by
/// [`Registry::subscribe`](crate::Registry::subscribe).
///
/// Pass it back to [`Registry::unsubscribe`](crate::Registry::unsubscribe) to
/// stop receiving notifications. Tokens are never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// Error returned by a failing subscriber callback.
///
/// The registry catches these per-callback during notification: the failure is
/// logged and remaining subscribers still run. See
/// [`Registry::subscribe`](crate::Registry::subscribe).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberError {
    message: String,
}

impl SubscriberError {
    /// Create an error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The carried message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for SubscriberError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for SubscriberError {}
