// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning composition layer and its notification loop.
//!
//! ## Overview
//!
//! [`Footnotes`] owns the registry, every marker and popup controller, and the
//! host. All lifecycle and interaction flows through it:
//!
//! - `create_*` / `destroy_*` replace element attach/detach callbacks with
//!   explicit operations.
//! - After every registry mutation it runs one synchronous sync pass: all
//!   marker controllers re-render, then all popup controllers step their
//!   state machine, in registration order, each observing the fully updated
//!   registry. No further mutation can interleave within a pass.
//! - Interaction events (`Toggle`, `Close`) are emitted through the host after
//!   the pass, once every instance is consistent.
//!
//! Page-level observers that want raw change notifications subscribe on the
//! registry itself via [`Footnotes::subscribe`].
//!
//! ## Dismissal flow
//!
//! The platform feeds capture-phase document clicks as pre-resolved
//! [`ClickHit`]s. A click inside any marker region is left alone (the marker's
//! own click arrives separately as [`Footnotes::toggle`]); a click inside the
//! open panel is left alone; anything else closes the open footnote and
//! reports the click as consumed. Escape closes unconditionally.
//!
//! Dropping a `Footnotes` tears down any open popup first, so document-level
//! listeners and the page scroll lock are released on every exit path.

use alloc::vec::Vec;

use marginalia_registry::{MarkerHandle, PopupHandle, Registry, SubscriberFn, SubscriberId};

use crate::host::Host;
use crate::marker::MarkerController;
use crate::popup::PopupController;
use crate::types::{ClickHit, FrameId};

/// Owner of the registry, all controllers, and the host.
///
/// See the [module docs](self) for the control flow.
pub struct Footnotes<H: Host> {
    registry: Registry,
    markers: Vec<MarkerController>,
    popups: Vec<PopupController>,
    host: H,
}

impl<H: Host> core::fmt::Debug for Footnotes<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Footnotes")
            .field("registry", &self.registry)
            .field("markers", &self.markers.len())
            .field("popups", &self.popups.len())
            .finish_non_exhaustive()
    }
}

impl<H: Host> Footnotes<H> {
    /// Create an empty composition over `host`.
    pub fn new(host: H) -> Self {
        Self {
            registry: Registry::new(),
            markers: Vec::new(),
            popups: Vec::new(),
            host,
        }
    }

    /// The shared registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The marker controller for `handle`, if it is still live.
    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerController> {
        self.markers.iter().find(|m| m.handle() == handle)
    }

    /// The popup controller for `handle`, if it is still live.
    pub fn popup(&self, handle: PopupHandle) -> Option<&PopupController> {
        self.popups.iter().find(|p| p.handle() == handle)
    }

    /// Subscribe a page-level observer to raw registry notifications.
    pub fn subscribe(&mut self, callback: SubscriberFn) -> SubscriberId {
        self.registry.subscribe(callback)
    }

    /// Remove a page-level observer.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Create a marker at the end of the marker sequence and render it.
    pub fn create_marker(&mut self) -> MarkerHandle {
        let controller = MarkerController::create(&mut self.registry, &mut self.host);
        let handle = controller.handle();
        self.markers.push(controller);
        self.sync();
        handle
    }

    /// Create a popup at the end of the popup sequence.
    pub fn create_popup(&mut self) -> PopupHandle {
        let controller = PopupController::create(&mut self.registry, &mut self.host);
        let handle = controller.handle();
        self.popups.push(controller);
        self.sync();
        handle
    }

    /// Destroy a marker. Rebalances the open index per registry rules.
    pub fn destroy_marker(&mut self, handle: MarkerHandle) {
        let Some(pos) = self.markers.iter().position(|m| m.handle() == handle) else {
            log::debug!("destroy_marker: unknown handle {handle:?}");
            return;
        };
        let controller = self.markers.remove(pos);
        controller.destroy(&mut self.registry, &mut self.host);
        self.sync();
    }

    /// Destroy a popup, tearing down its panel first if rendered.
    pub fn destroy_popup(&mut self, handle: PopupHandle) {
        let Some(pos) = self.popups.iter().position(|p| p.handle() == handle) else {
            log::debug!("destroy_popup: unknown handle {handle:?}");
            return;
        };
        let controller = self.popups.remove(pos);
        controller.destroy(&mut self.registry, &mut self.host);
        self.sync();
    }

    /// Destroy one logical footnote: its marker and its popup, in lockstep.
    ///
    /// Runs a single sync pass after both removals, so a popup that stays
    /// open across the removal (its index shifted down with the open index)
    /// keeps its rendered panel instead of tearing down and rebuilding.
    pub fn destroy_footnote(&mut self, marker: MarkerHandle, popup: PopupHandle) {
        if let Some(pos) = self.markers.iter().position(|m| m.handle() == marker) {
            let controller = self.markers.remove(pos);
            controller.destroy(&mut self.registry, &mut self.host);
        }
        if let Some(pos) = self.popups.iter().position(|p| p.handle() == popup) {
            let controller = self.popups.remove(pos);
            controller.destroy(&mut self.registry, &mut self.host);
        }
        self.sync();
    }

    /// Toggle a marker: open its footnote if closed, close it if open.
    pub fn toggle(&mut self, handle: MarkerHandle) {
        let Some(pos) = self.markers.iter().position(|m| m.handle() == handle) else {
            log::debug!("toggle: unknown handle {handle:?}");
            return;
        };
        if let Some(event) = self.markers[pos].toggle(&mut self.registry) {
            self.sync();
            self.host.emit(event);
        }
    }

    /// Open a marker's footnote directly.
    pub fn open(&mut self, handle: MarkerHandle) {
        let Some(pos) = self.markers.iter().position(|m| m.handle() == handle) else {
            return;
        };
        if self.markers[pos].open(&mut self.registry) {
            self.sync();
        }
    }

    /// Close a marker's footnote. No-op unless that marker is the open one.
    pub fn close(&mut self, handle: MarkerHandle) {
        let Some(pos) = self.markers.iter().position(|m| m.handle() == handle) else {
            return;
        };
        if self.markers[pos].close(&mut self.registry) {
            self.sync();
        }
    }

    /// Deliver a capture-phase document click.
    ///
    /// Returns `true` when the click dismissed the open footnote and should
    /// be consumed (default prevented, propagation stopped) by the platform.
    pub fn document_click(&mut self, hit: ClickHit) -> bool {
        // Clicks on a marker are the marker's own business.
        if hit.marker.is_some() {
            return false;
        }
        let Some(open) = self.registry.open_index() else {
            return false;
        };
        // Inside the open panel: leave it alone. Regions of other popups do
        // not shield the click; they have no rendered panel to click into,
        // and their wrappers are ordinary page content here.
        if let Some(panel) = hit.panel
            && self.registry.popup_index(panel) == Some(open)
        {
            return false;
        }
        self.dismiss(open);
        true
    }

    /// Deliver an escape key press. Closes the open footnote, if any,
    /// regardless of the current focus target.
    pub fn escape(&mut self) {
        if let Some(open) = self.registry.open_index() {
            self.dismiss(open);
        }
    }

    /// Deliver a click on a panel's own dismiss control.
    pub fn dismiss_clicked(&mut self, handle: PopupHandle) {
        let Some(pos) = self.popups.iter().position(|p| p.handle() == handle) else {
            return;
        };
        if let Some(event) = self.popups[pos].close(&mut self.registry) {
            self.sync();
            self.host.emit(event);
        }
    }

    /// Deliver a fired rendering frame to whichever popup scheduled it.
    pub fn frame(&mut self, frame: FrameId) {
        let Self {
            registry,
            popups,
            host,
            markers: _,
        } = self;
        let view = registry.view();
        for popup in popups.iter_mut() {
            if popup.frame(frame, &view, host) {
                break;
            }
        }
    }

    /// Deliver a host-reported size change of a rendered panel.
    pub fn panel_resized(&mut self, handle: PopupHandle) {
        let Some(pos) = self.popups.iter().position(|p| p.handle() == handle) else {
            return;
        };
        self.popups[pos].panel_resized(&mut self.host);
    }

    /// Close the open footnote and release every held page resource.
    ///
    /// Runs automatically on drop; harmless to call when nothing is open.
    pub fn teardown(&mut self) {
        if self.registry.open_index().is_some() {
            self.registry.set_open_index(None);
            self.sync();
        }
    }

    fn dismiss(&mut self, open: usize) {
        let pos = self
            .popups
            .iter()
            .position(|p| p.index(&self.registry) == Some(open));
        let event = match pos {
            Some(pos) => self.popups[pos].close(&mut self.registry),
            // No paired popup; still clear the open index.
            None => {
                self.registry.set_open_index(None);
                None
            }
        };
        self.sync();
        if let Some(event) = event {
            self.host.emit(event);
        }
    }

    /// One synchronous notification pass over every live instance.
    fn sync(&mut self) {
        let Self {
            registry,
            markers,
            popups,
            host,
        } = self;
        let view = registry.view();
        for marker in markers.iter() {
            marker.sync(&view, host);
        }
        for popup in popups.iter_mut() {
            popup.sync(&view, host);
        }
    }
}

impl<H: Host> Drop for Footnotes<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
