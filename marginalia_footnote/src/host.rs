// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: every document capability the controllers consume.
//!
//! ## Overview
//!
//! The controllers never touch a document directly. Everything they need —
//! marker DOM surgery, panel build/teardown, rect measurement, the page
//! scroll lock, frame scheduling, dismissal listeners, size observation, and
//! event emission — goes through this trait, so the state machine runs
//! unchanged against a browser DOM, a test double, or a headless renderer.
//!
//! Resource-shaped capabilities hand out tokens ([`FrameId`], [`DismissGuard`],
//! [`SizeWatch`]) that the controllers return on every exit path.

use kurbo::Rect;
use marginalia_registry::{MarkerHandle, PopupHandle};

use crate::types::{
    DismissGuard, FootnoteEvent, FrameId, MarkerVisual, PanelFlags, PanelHeights, PanelSpec,
    SizeWatch,
};

/// Document capabilities consumed by the marker and popup controllers.
///
/// Geometry is in document coordinates; the controllers only ever compare
/// tops, so any consistent coordinate space works. Operations are infallible
/// in the DOM's manner: a host asked about an element it no longer knows
/// should return a zero rect rather than fail.
pub trait Host {
    /// Split a marker's content into a label plus an appended interactive
    /// button. Called once when the marker is created.
    fn init_marker(&mut self, marker: MarkerHandle);

    /// Undo [`Self::init_marker`]: detach the click handler and drop the
    /// button. Called once when the marker is destroyed.
    fn teardown_marker(&mut self, marker: MarkerHandle);

    /// Apply the full visual state of one marker: numeral text, expanded
    /// flag, controlled-panel id, and state classes.
    fn apply_marker(&mut self, marker: MarkerHandle, visual: &MarkerVisual);

    /// Wrap a popup's original content. Called once when the popup is created.
    fn init_popup(&mut self, popup: PopupHandle);

    /// Undo [`Self::init_popup`]. Called once when the popup is destroyed.
    fn teardown_popup(&mut self, popup: PopupHandle);

    /// Build the rendered panel inside `popup`'s wrapper, per `spec`.
    ///
    /// The host clones the wrapper's original content, appends a dismiss
    /// control, stamps the numeral badge, and should save/restore the page
    /// scroll position around insertion.
    fn build_panel(&mut self, popup: PopupHandle, spec: &PanelSpec);

    /// Remove the rendered panel from the document.
    fn destroy_panel(&mut self, popup: PopupHandle);

    /// Store the vertical positioning offset for `popup`'s wrapper (a CSS
    /// custom property on the DOM side).
    fn set_panel_offset(&mut self, popup: PopupHandle, offset: f64);

    /// Apply the panel's visual state classes.
    fn set_panel_flags(&mut self, popup: PopupHandle, flags: PanelFlags);

    /// Force a synchronous layout flush so subsequent measurements are exact.
    fn flush_layout(&mut self);

    /// Bounding rect of a marker's trigger element.
    fn marker_rect(&self, marker: MarkerHandle) -> Rect;

    /// Bounding rect of a popup's content wrapper.
    fn wrapper_rect(&self, popup: PopupHandle) -> Rect;

    /// Content and visible heights of the rendered panel.
    fn panel_heights(&self, popup: PopupHandle) -> PanelHeights;

    /// Fix or release the document root's overflow. Unconditional set/clear;
    /// the single-open invariant keeps this race-free.
    fn set_scroll_lock(&mut self, locked: bool);

    /// Schedule one rendering frame and return its id. The platform calls
    /// [`Footnotes::frame`](crate::Footnotes::frame) when it fires.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a scheduled frame. Cancelling an already-fired frame is a no-op.
    fn cancel_frame(&mut self, frame: FrameId);

    /// Start delivering capture-phase document clicks and key presses for
    /// dismissal (via [`Footnotes::document_click`](crate::Footnotes::document_click)
    /// and [`Footnotes::escape`](crate::Footnotes::escape)).
    fn arm_dismissal(&mut self) -> DismissGuard;

    /// Stop delivering dismissal events for this guard.
    fn release_dismissal(&mut self, guard: DismissGuard);

    /// Begin observing the rendered panel's own size; report changes through
    /// [`Footnotes::panel_resized`](crate::Footnotes::panel_resized).
    fn observe_panel_size(&mut self, popup: PopupHandle) -> SizeWatch;

    /// Stop observing for this watch.
    fn unobserve_panel_size(&mut self, watch: SizeWatch);

    /// Emit a bubbling interaction event for page-level scripts.
    fn emit(&mut self, event: FootnoteEvent);
}

/// A host that does nothing, for docs, tests, and headless use.
///
/// Tokens are minted from a private counter; all measurements are zero.
#[derive(Debug, Default)]
pub struct NoopHost {
    next_token: u64,
}

impl NoopHost {
    /// Create a fresh no-op host.
    pub fn new() -> Self {
        Self { next_token: 0 }
    }

    fn mint(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Host for NoopHost {
    fn init_marker(&mut self, _marker: MarkerHandle) {}
    fn teardown_marker(&mut self, _marker: MarkerHandle) {}
    fn apply_marker(&mut self, _marker: MarkerHandle, _visual: &MarkerVisual) {}
    fn init_popup(&mut self, _popup: PopupHandle) {}
    fn teardown_popup(&mut self, _popup: PopupHandle) {}
    fn build_panel(&mut self, _popup: PopupHandle, _spec: &PanelSpec) {}
    fn destroy_panel(&mut self, _popup: PopupHandle) {}
    fn set_panel_offset(&mut self, _popup: PopupHandle, _offset: f64) {}
    fn set_panel_flags(&mut self, _popup: PopupHandle, _flags: PanelFlags) {}
    fn flush_layout(&mut self) {}

    fn marker_rect(&self, _marker: MarkerHandle) -> Rect {
        Rect::ZERO
    }

    fn wrapper_rect(&self, _popup: PopupHandle) -> Rect {
        Rect::ZERO
    }

    fn panel_heights(&self, _popup: PopupHandle) -> PanelHeights {
        PanelHeights::default()
    }

    fn set_scroll_lock(&mut self, _locked: bool) {}

    fn request_frame(&mut self) -> FrameId {
        FrameId::new(self.mint())
    }

    fn cancel_frame(&mut self, _frame: FrameId) {}

    fn arm_dismissal(&mut self) -> DismissGuard {
        DismissGuard::new(self.mint())
    }

    fn release_dismissal(&mut self, _guard: DismissGuard) {}

    fn observe_panel_size(&mut self, _popup: PopupHandle) -> SizeWatch {
        SizeWatch::new(self.mint())
    }

    fn unobserve_panel_size(&mut self, _watch: SizeWatch) {}

    fn emit(&mut self, _event: FootnoteEvent) {}
}
