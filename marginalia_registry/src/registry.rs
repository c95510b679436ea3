// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry implementation: handle sequences, the open index, and notification.
//!
//! ## Overview
//!
//! Mutating calls append/remove handles or move the open index, then notify
//! every subscriber synchronously in registration order. Each subscriber sees
//! the fully updated state through a borrowed [`RegistryView`]; no further
//! mutation can be interleaved within a notification pass.
//!
//! ## Open-index rebalancing
//!
//! - Unregistering the marker at the open index clears the open index.
//! - Unregistering a marker below it decrements it by one, so it keeps
//!   pointing at the same logical footnote.
//! - Unregistering a marker above it, or any popup, leaves it unchanged.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::{MarkerHandle, PopupHandle, SubscriberError, SubscriberId};

/// Callback invoked after every registry mutation.
///
/// Receives a read-only view of the post-mutation state. A returned error is
/// logged and does not affect other subscribers.
pub type SubscriberFn = Box<dyn FnMut(&RegistryView<'_>) -> Result<(), SubscriberError>>;

struct Subscriber {
    id: SubscriberId,
    callback: SubscriberFn,
}

/// Ordered bookkeeping for footnote markers and popups.
///
/// The single source of truth shared by every marker and popup instance. See
/// the [crate docs](crate) for the ordering and notification contract.
pub struct Registry {
    markers: Vec<MarkerHandle>,
    popups: Vec<PopupHandle>,
    open: Option<usize>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("markers", &self.markers.len())
            .field("popups", &self.popups.len())
            .field("open", &self.open)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of registry state, as observed by subscribers.
///
/// Borrowed from the registry for the duration of one notification pass (or
/// obtained on demand via [`Registry::view`]). Offers the same identity
/// lookups as the registry itself.
#[derive(Copy, Clone, Debug)]
pub struct RegistryView<'a> {
    markers: &'a [MarkerHandle],
    popups: &'a [PopupHandle],
    open: Option<usize>,
}

impl<'a> RegistryView<'a> {
    /// The marker sequence, in registration order.
    pub fn markers(&self) -> &'a [MarkerHandle] {
        self.markers
    }

    /// The popup sequence, in registration order.
    pub fn popups(&self) -> &'a [PopupHandle] {
        self.popups
    }

    /// The open index, if any footnote is open.
    pub fn open(&self) -> Option<usize> {
        self.open
    }

    /// Position of `handle` in the marker sequence, or `None` if unregistered.
    pub fn marker_index(&self, handle: MarkerHandle) -> Option<usize> {
        self.markers.iter().position(|&m| m == handle)
    }

    /// Position of `handle` in the popup sequence, or `None` if unregistered.
    pub fn popup_index(&self, handle: PopupHandle) -> Option<usize> {
        self.popups.iter().position(|&p| p == handle)
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            popups: Vec::new(),
            open: None,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    fn mint(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Append a new marker to the marker sequence and notify subscribers.
    ///
    /// Returns the minted handle. The new marker's index is the last position
    /// in the sequence.
    pub fn register_marker(&mut self) -> MarkerHandle {
        let handle = MarkerHandle(self.mint());
        self.markers.push(handle);
        self.notify();
        handle
    }

    /// Append a new popup to the popup sequence and notify subscribers.
    pub fn register_popup(&mut self) -> PopupHandle {
        let handle = PopupHandle(self.mint());
        self.popups.push(handle);
        self.notify();
        handle
    }

    /// Remove a marker by identity and notify subscribers.
    ///
    /// If the removed position equals the open index, the open index is
    /// cleared; if it is below the open index, the open index is decremented.
    /// Unregistering a handle that is not present is a silent no-op.
    pub fn unregister_marker(&mut self, handle: MarkerHandle) {
        let Some(pos) = self.marker_index(handle) else {
            log::debug!("unregister_marker: stale handle {handle:?}");
            return;
        };
        self.markers.remove(pos);
        match self.open {
            Some(open) if open == pos => self.open = None,
            Some(open) if open > pos => self.open = Some(open - 1),
            _ => {}
        }
        self.notify();
    }

    /// Remove a popup by identity and notify subscribers.
    ///
    /// The open index is not rebalanced: markers and popups are expected to be
    /// unregistered in lockstep, and the marker side owns the rebalancing.
    /// Unregistering a handle that is not present is a silent no-op.
    pub fn unregister_popup(&mut self, handle: PopupHandle) {
        let Some(pos) = self.popup_index(handle) else {
            log::debug!("unregister_popup: stale handle {handle:?}");
            return;
        };
        self.popups.remove(pos);
        self.notify();
    }

    /// Position of `handle` in the marker sequence, or `None` if unregistered.
    pub fn marker_index(&self, handle: MarkerHandle) -> Option<usize> {
        self.markers.iter().position(|&m| m == handle)
    }

    /// Position of `handle` in the popup sequence, or `None` if unregistered.
    pub fn popup_index(&self, handle: PopupHandle) -> Option<usize> {
        self.popups.iter().position(|&p| p == handle)
    }

    /// The marker sequence, in registration order.
    pub fn markers(&self) -> &[MarkerHandle] {
        &self.markers
    }

    /// The popup sequence, in registration order.
    pub fn popups(&self) -> &[PopupHandle] {
        &self.popups
    }

    /// Number of registered markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Number of registered popups.
    pub fn popup_count(&self) -> usize {
        self.popups.len()
    }

    /// The open index, if any footnote is open.
    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    /// Set or clear the open index.
    ///
    /// Setting the current value again is a silent no-op (no notification).
    /// Any change notifies subscribers.
    ///
    /// The caller is expected to pass an index that is valid in both
    /// sequences; a mismatched marker/popup pairing is not defended here and
    /// leads to undefined positioning downstream.
    pub fn set_open_index(&mut self, value: Option<usize>) {
        if self.open == value {
            return;
        }
        if let Some(index) = value {
            debug_assert!(
                index < self.markers.len() && index < self.popups.len(),
                "open index must be a valid position in both sequences"
            );
        }
        self.open = value;
        self.notify();
    }

    /// Borrow a read-only view of the current state.
    pub fn view(&self) -> RegistryView<'_> {
        RegistryView {
            markers: &self.markers,
            popups: &self.popups,
            open: self.open,
        }
    }

    /// Add a subscriber, returning a token for [`Self::unsubscribe`].
    ///
    /// Subscribers run synchronously after every mutating call, in
    /// registration order. A subscriber that returns an error is logged and
    /// skipped; the remaining subscribers still run.
    pub fn subscribe(&mut self, callback: SubscriberFn) -> SubscriberId {
        let id = SubscriberId(self.mint());
        self.subscribers.push(Subscriber { id, callback });
        id
    }

    /// Remove a subscriber. Returns whether the token was known.
    ///
    /// Unsubscribing an unknown or already-removed token is a safe no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let Some(pos) = self.subscribers.iter().position(|s| s.id == id) else {
            return false;
        };
        self.subscribers.remove(pos);
        true
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        // State is fully updated before any callback runs. Callbacks only see
        // the borrowed view, so no mutation can interleave within a pass.
        let mut subscribers = core::mem::take(&mut self.subscribers);
        let view = RegistryView {
            markers: &self.markers,
            popups: &self.popups,
            open: self.open,
        };
        for subscriber in &mut subscribers {
            if let Err(err) = (subscriber.callback)(&view) {
                log::warn!("registry subscriber {:?} failed: {err}", subscriber.id);
            }
        }
        self.subscribers = subscribers;
    }
}
