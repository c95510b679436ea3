// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker controller: the clickable, auto-numbered footnote trigger.
//!
//! A marker never caches its index. On every sync pass it recomputes its
//! position by identity lookup — the registry is authoritative and earlier
//! markers may have come or gone — and pushes its full visual state to the
//! host: the 1-based numeral, the expanded flag, the id of the panel it
//! controls, and the open/wide state classes.

use alloc::string::String;

use marginalia_registry::{MarkerHandle, Registry, RegistryView};

use crate::host::Host;
use crate::types::{FootnoteEvent, MarkerFlags, MarkerVisual, WIDE_NUMERAL_MIN, panel_id, symbol};

/// Per-marker component. Created and destroyed by the owning
/// [`Footnotes`](crate::Footnotes) composition layer.
#[derive(Debug)]
pub struct MarkerController {
    handle: MarkerHandle,
}

impl MarkerController {
    /// Register a new marker and let the host split its content into a label
    /// plus an appended interactive button.
    pub(crate) fn create<H: Host>(registry: &mut Registry, host: &mut H) -> Self {
        let handle = registry.register_marker();
        host.init_marker(handle);
        Self { handle }
    }

    /// Unregister and undo the host-side DOM surgery.
    pub(crate) fn destroy<H: Host>(self, registry: &mut Registry, host: &mut H) {
        registry.unregister_marker(self.handle);
        host.teardown_marker(self.handle);
    }

    /// This marker's registry handle.
    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    /// Current derived index, or `None` once unregistered.
    pub fn index(&self, registry: &Registry) -> Option<usize> {
        registry.marker_index(self.handle)
    }

    /// Current 1-based numeral, or `None` once unregistered.
    pub fn symbol(&self, registry: &Registry) -> Option<String> {
        self.index(registry).map(symbol)
    }

    /// Whether this marker's footnote is the open one.
    pub fn is_open(&self, registry: &Registry) -> bool {
        let index = registry.marker_index(self.handle);
        index.is_some() && registry.open_index() == index
    }

    /// Recompute and push this marker's visual state. Runs on every sync pass.
    pub(crate) fn sync<H: Host>(&self, view: &RegistryView<'_>, host: &mut H) {
        let Some(index) = view.marker_index(self.handle) else {
            return;
        };
        let is_open = view.open() == Some(index);
        let mut flags = MarkerFlags::empty();
        if is_open {
            flags |= MarkerFlags::OPEN;
        }
        if index >= WIDE_NUMERAL_MIN {
            flags |= MarkerFlags::WIDE;
        }
        host.apply_marker(
            self.handle,
            &MarkerVisual {
                numeral: symbol(index),
                expanded: is_open,
                controls: panel_id(index),
                flags,
            },
        );
    }

    /// Open this footnote if closed, close it if open.
    ///
    /// Returns the toggle event to emit after the sync pass, or `None` for a
    /// stale handle.
    pub(crate) fn toggle(&self, registry: &mut Registry) -> Option<FootnoteEvent> {
        let index = registry.marker_index(self.handle)?;
        let open = registry.open_index() != Some(index);
        registry.set_open_index(open.then_some(index));
        Some(FootnoteEvent::Toggle { index, open })
    }

    /// Set the open index to this marker. Returns whether anything changed.
    pub(crate) fn open(&self, registry: &mut Registry) -> bool {
        let Some(index) = registry.marker_index(self.handle) else {
            return false;
        };
        if registry.open_index() == Some(index) {
            return false;
        }
        registry.set_open_index(Some(index));
        true
    }

    /// Clear the open index. No-op unless this marker is the open one.
    pub(crate) fn close(&self, registry: &mut Registry) -> bool {
        let Some(index) = registry.marker_index(self.handle) else {
            return false;
        };
        if registry.open_index() != Some(index) {
            return false;
        }
        registry.set_open_index(None);
        true
    }
}
