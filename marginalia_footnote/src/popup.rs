// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup controller: the open/close state machine behind each footnote panel.
//!
//! ## States
//!
//! - **Closed**: no rendered panel. The popup's wrapper holds the original
//!   content and nothing else.
//! - **Open**: panel built, dismissal armed, size observed, and one frame
//!   scheduled for the deferred position measurement.
//!
//! Transitions are driven exclusively by sync passes comparing the popup's
//! derived index against the registry's open index.
//!
//! ## Deferred positioning
//!
//! Opening builds the panel first and measures one frame later, so layout can
//! settle after insertion. The scheduled frame is cancelled on close; a late
//! or stale frame id is ignored.
//!
//! ## Scroll lock
//!
//! When the panel's content overflows its visible height the panel is marked
//! scrollable and page scrolling is locked by fixing the document root's
//! overflow. The lock is an unconditional set/clear shared by all popups;
//! the single-open invariant is what keeps that sound.

use marginalia_registry::{PopupHandle, Registry, RegistryView};

use crate::host::Host;
use crate::types::{DismissGuard, FootnoteEvent, FrameId, PanelFlags, PanelSpec, SizeWatch};

/// Resources and measurements held while the panel is rendered.
#[derive(Debug)]
struct OpenPanel {
    dismiss: Option<DismissGuard>,
    watch: Option<SizeWatch>,
    pending_frame: Option<FrameId>,
    wide: bool,
    offset: f64,
    scrollable: bool,
}

#[derive(Debug)]
enum PanelState {
    Closed,
    Open(OpenPanel),
}

/// Per-popup component. Created and destroyed by the owning
/// [`Footnotes`](crate::Footnotes) composition layer.
#[derive(Debug)]
pub struct PopupController {
    handle: PopupHandle,
    state: PanelState,
}

impl PopupController {
    /// Register a new popup and let the host wrap its original content.
    pub(crate) fn create<H: Host>(registry: &mut Registry, host: &mut H) -> Self {
        let handle = registry.register_popup();
        host.init_popup(handle);
        Self {
            handle,
            state: PanelState::Closed,
        }
    }

    /// Tear down any rendered panel, unregister, and undo the host-side wrap.
    pub(crate) fn destroy<H: Host>(mut self, registry: &mut Registry, host: &mut H) {
        self.teardown(host);
        registry.unregister_popup(self.handle);
        host.teardown_popup(self.handle);
    }

    /// This popup's registry handle.
    pub fn handle(&self) -> PopupHandle {
        self.handle
    }

    /// Current derived index, or `None` once unregistered.
    pub fn index(&self, registry: &Registry) -> Option<usize> {
        registry.popup_index(self.handle)
    }

    /// Whether this popup's index is the registry's open index.
    pub fn is_open(&self, registry: &Registry) -> bool {
        let index = registry.popup_index(self.handle);
        index.is_some() && registry.open_index() == index
    }

    /// Whether the panel is currently rendered (machine state **Open**).
    pub fn has_panel(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    /// Last evaluated scrollability, `false` while closed.
    pub fn is_scrollable(&self) -> bool {
        match &self.state {
            PanelState::Open(open) => open.scrollable,
            PanelState::Closed => false,
        }
    }

    /// Last stored positioning offset, `None` while closed.
    pub fn offset_top(&self) -> Option<f64> {
        match &self.state {
            PanelState::Open(open) => Some(open.offset),
            PanelState::Closed => None,
        }
    }

    /// Step the state machine against the post-mutation registry state.
    pub(crate) fn sync<H: Host>(&mut self, view: &RegistryView<'_>, host: &mut H) {
        let index = view.popup_index(self.handle);
        match index {
            Some(index) if view.open() == Some(index) => match self.state {
                // Already open by an unrelated mutation: re-measure in place.
                PanelState::Open(_) => self.reposition(index, view, host),
                PanelState::Closed => self.build(index, host),
            },
            _ => self.teardown(host),
        }
    }

    /// Closed → Open: build the panel, arm dismissal, observe size, and
    /// schedule the deferred position measurement.
    fn build<H: Host>(&mut self, index: usize, host: &mut H) {
        let spec = PanelSpec::for_index(index);
        host.build_panel(self.handle, &spec);
        let dismiss = host.arm_dismissal();
        let watch = host.observe_panel_size(self.handle);
        let pending_frame = host.request_frame();
        self.state = PanelState::Open(OpenPanel {
            dismiss: Some(dismiss),
            watch: Some(watch),
            pending_frame: Some(pending_frame),
            wide: spec.wide,
            offset: 0.0,
            scrollable: false,
        });
    }

    /// Open → Closed: cancel the pending frame, release every held resource,
    /// drop the panel, and clear the page scroll lock.
    fn teardown<H: Host>(&mut self, host: &mut H) {
        let PanelState::Open(open) = &mut self.state else {
            return;
        };
        if let Some(frame) = open.pending_frame.take() {
            host.cancel_frame(frame);
        }
        if let Some(guard) = open.dismiss.take() {
            host.release_dismissal(guard);
        }
        if let Some(watch) = open.watch.take() {
            host.unobserve_panel_size(watch);
        }
        host.destroy_panel(self.handle);
        host.set_scroll_lock(false);
        self.state = PanelState::Closed;
    }

    /// Measure and store the wrapper's vertical offset, then re-evaluate
    /// scrollability.
    ///
    /// The offset is reset to zero and layout flushed first, so the rects are
    /// measured from a clean baseline. A missing marker at this index leaves
    /// the position untouched.
    fn reposition<H: Host>(&mut self, index: usize, view: &RegistryView<'_>, host: &mut H) {
        if let Some(&marker) = view.markers().get(index) {
            host.set_panel_offset(self.handle, 0.0);
            host.flush_layout();
            let marker_rect = host.marker_rect(marker);
            let wrapper_rect = host.wrapper_rect(self.handle);
            let offset = marker_rect.y0 - wrapper_rect.y0;
            host.set_panel_offset(self.handle, offset);
            if let PanelState::Open(open) = &mut self.state {
                open.offset = offset;
            }
        }
        self.check_scrollability(host);
    }

    /// Compare content and visible heights; mark the panel scrollable and
    /// lock page scrolling when content overflows, clear both otherwise.
    fn check_scrollability<H: Host>(&mut self, host: &mut H) {
        let PanelState::Open(open) = &mut self.state else {
            return;
        };
        let scrollable = host.panel_heights(self.handle).overflows();
        open.scrollable = scrollable;
        let mut flags = PanelFlags::empty();
        if scrollable {
            flags |= PanelFlags::SCROLLABLE;
        }
        if open.wide {
            flags |= PanelFlags::WIDE_NUMERAL;
        }
        host.set_panel_flags(self.handle, flags);
        host.set_scroll_lock(scrollable);
    }

    /// Deliver a fired rendering frame.
    ///
    /// Returns `true` when the frame id matched this popup's pending
    /// measurement, which then runs. Stale or foreign ids are ignored.
    pub(crate) fn frame<H: Host>(
        &mut self,
        frame: FrameId,
        view: &RegistryView<'_>,
        host: &mut H,
    ) -> bool {
        let PanelState::Open(open) = &mut self.state else {
            return false;
        };
        if open.pending_frame != Some(frame) {
            return false;
        }
        open.pending_frame = None;
        if let Some(index) = view.popup_index(self.handle) {
            self.reposition(index, view, host);
        }
        true
    }

    /// Re-evaluate scrollability after a host-reported panel size change.
    pub(crate) fn panel_resized<H: Host>(&mut self, host: &mut H) {
        self.check_scrollability(host);
    }

    /// Close this footnote through the dismissal path.
    ///
    /// Returns the close event to emit after the sync pass. No-op unless this
    /// popup is the open one.
    pub(crate) fn close(&self, registry: &mut Registry) -> Option<FootnoteEvent> {
        let index = registry.popup_index(self.handle)?;
        if registry.open_index() != Some(index) {
            return None;
        }
        registry.set_open_index(None);
        Some(FootnoteEvent::Close { index })
    }
}
