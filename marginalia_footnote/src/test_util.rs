// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host double shared by the unit tests.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;
use marginalia_registry::{MarkerHandle, PopupHandle};

use crate::host::Host;
use crate::types::{
    DismissGuard, FootnoteEvent, FrameId, MarkerVisual, PanelFlags, PanelHeights, PanelSpec,
    SizeWatch,
};

/// One recorded host call, for order-sensitive assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    InitMarker(MarkerHandle),
    TeardownMarker(MarkerHandle),
    InitPopup(PopupHandle),
    TeardownPopup(PopupHandle),
    BuildPanel(PopupHandle),
    DestroyPanel(PopupHandle),
}

/// In-memory host that records every interaction and serves back scripted
/// geometry.
#[derive(Debug, Default)]
pub(crate) struct TestHost {
    calls: Vec<Call>,
    marker_visuals: BTreeMap<MarkerHandle, MarkerVisual>,
    built: BTreeMap<PopupHandle, PanelSpec>,
    build_counts: BTreeMap<PopupHandle, usize>,
    offsets: BTreeMap<PopupHandle, Vec<f64>>,
    flags: BTreeMap<PopupHandle, PanelFlags>,
    marker_rects: BTreeMap<MarkerHandle, Rect>,
    wrapper_rects: BTreeMap<PopupHandle, Rect>,
    heights: BTreeMap<PopupHandle, PanelHeights>,
    scroll_locked: bool,
    next_token: u64,
    frames: Vec<u64>,
    cancelled_frames: Vec<u64>,
    guards: Vec<u64>,
    watches: Vec<u64>,
    flushes: usize,
    events: Vec<FootnoteEvent>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    // Scripting.

    pub(crate) fn place_marker(&mut self, marker: MarkerHandle, rect: Rect) {
        self.marker_rects.insert(marker, rect);
    }

    pub(crate) fn place_wrapper(&mut self, popup: PopupHandle, rect: Rect) {
        self.wrapper_rects.insert(popup, rect);
    }

    pub(crate) fn set_heights(&mut self, popup: PopupHandle, content: f64, visible: f64) {
        self.heights.insert(popup, PanelHeights { content, visible });
    }

    // Inspection.

    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub(crate) fn events(&self) -> &[FootnoteEvent] {
        &self.events
    }

    pub(crate) fn marker_visual(&self, marker: MarkerHandle) -> MarkerVisual {
        self.marker_visuals
            .get(&marker)
            .cloned()
            .expect("marker was never rendered")
    }

    pub(crate) fn built_spec(&self, popup: PopupHandle) -> PanelSpec {
        self.built
            .get(&popup)
            .cloned()
            .expect("panel is not rendered")
    }

    pub(crate) fn has_open_panel(&self, popup: PopupHandle) -> bool {
        self.built.contains_key(&popup)
    }

    pub(crate) fn build_count(&self, popup: PopupHandle) -> usize {
        self.build_counts.get(&popup).copied().unwrap_or(0)
    }

    pub(crate) fn offsets_for(&self, popup: PopupHandle) -> &[f64] {
        self.offsets.get(&popup).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn panel_flags(&self, popup: PopupHandle) -> PanelFlags {
        self.flags.get(&popup).copied().unwrap_or_default()
    }

    pub(crate) fn layout_flushes(&self) -> usize {
        self.flushes
    }

    pub(crate) fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub(crate) fn last_frame(&self) -> FrameId {
        FrameId::new(*self.frames.last().expect("no frame was requested"))
    }

    pub(crate) fn cancelled(&self, frame: FrameId) -> bool {
        self.cancelled_frames.contains(&frame.raw())
    }

    pub(crate) fn dismissal_armed_count(&self) -> usize {
        self.guards.len()
    }

    pub(crate) fn watch_count(&self) -> usize {
        self.watches.len()
    }
}

impl Host for TestHost {
    fn init_marker(&mut self, marker: MarkerHandle) {
        self.calls.push(Call::InitMarker(marker));
    }

    fn teardown_marker(&mut self, marker: MarkerHandle) {
        self.calls.push(Call::TeardownMarker(marker));
        self.marker_visuals.remove(&marker);
    }

    fn apply_marker(&mut self, marker: MarkerHandle, visual: &MarkerVisual) {
        self.marker_visuals.insert(marker, visual.clone());
    }

    fn init_popup(&mut self, popup: PopupHandle) {
        self.calls.push(Call::InitPopup(popup));
    }

    fn teardown_popup(&mut self, popup: PopupHandle) {
        self.calls.push(Call::TeardownPopup(popup));
    }

    fn build_panel(&mut self, popup: PopupHandle, spec: &PanelSpec) {
        self.calls.push(Call::BuildPanel(popup));
        self.built.insert(popup, spec.clone());
        *self.build_counts.entry(popup).or_insert(0) += 1;
    }

    fn destroy_panel(&mut self, popup: PopupHandle) {
        self.calls.push(Call::DestroyPanel(popup));
        self.built.remove(&popup);
    }

    fn set_panel_offset(&mut self, popup: PopupHandle, offset: f64) {
        self.offsets.entry(popup).or_default().push(offset);
    }

    fn set_panel_flags(&mut self, popup: PopupHandle, flags: PanelFlags) {
        self.flags.insert(popup, flags);
    }

    fn flush_layout(&mut self) {
        self.flushes += 1;
    }

    fn marker_rect(&self, marker: MarkerHandle) -> Rect {
        self.marker_rects.get(&marker).copied().unwrap_or(Rect::ZERO)
    }

    fn wrapper_rect(&self, popup: PopupHandle) -> Rect {
        self.wrapper_rects.get(&popup).copied().unwrap_or(Rect::ZERO)
    }

    fn panel_heights(&self, popup: PopupHandle) -> PanelHeights {
        self.heights.get(&popup).copied().unwrap_or_default()
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn request_frame(&mut self) -> FrameId {
        let raw = self.mint();
        self.frames.push(raw);
        FrameId::new(raw)
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|&raw| raw != frame.raw());
        self.cancelled_frames.push(frame.raw());
    }

    fn arm_dismissal(&mut self) -> DismissGuard {
        let raw = self.mint();
        self.guards.push(raw);
        DismissGuard::new(raw)
    }

    fn release_dismissal(&mut self, guard: DismissGuard) {
        let raw = guard.into_raw();
        self.guards.retain(|&g| g != raw);
    }

    fn observe_panel_size(&mut self, _popup: PopupHandle) -> SizeWatch {
        let raw = self.mint();
        self.watches.push(raw);
        SizeWatch::new(raw)
    }

    fn unobserve_panel_size(&mut self, watch: SizeWatch) {
        let raw = watch.into_raw();
        self.watches.retain(|&w| w != raw);
    }

    fn emit(&mut self, event: FootnoteEvent) {
        self.events.push(event);
    }
}

/// Shared handle to a [`TestHost`], for tests that need to inspect the host
/// after the owning [`Footnotes`](crate::Footnotes) has been dropped.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedHost(pub(crate) Rc<RefCell<TestHost>>);

impl Host for SharedHost {
    fn init_marker(&mut self, marker: MarkerHandle) {
        self.0.borrow_mut().init_marker(marker);
    }

    fn teardown_marker(&mut self, marker: MarkerHandle) {
        self.0.borrow_mut().teardown_marker(marker);
    }

    fn apply_marker(&mut self, marker: MarkerHandle, visual: &MarkerVisual) {
        self.0.borrow_mut().apply_marker(marker, visual);
    }

    fn init_popup(&mut self, popup: PopupHandle) {
        self.0.borrow_mut().init_popup(popup);
    }

    fn teardown_popup(&mut self, popup: PopupHandle) {
        self.0.borrow_mut().teardown_popup(popup);
    }

    fn build_panel(&mut self, popup: PopupHandle, spec: &PanelSpec) {
        self.0.borrow_mut().build_panel(popup, spec);
    }

    fn destroy_panel(&mut self, popup: PopupHandle) {
        self.0.borrow_mut().destroy_panel(popup);
    }

    fn set_panel_offset(&mut self, popup: PopupHandle, offset: f64) {
        self.0.borrow_mut().set_panel_offset(popup, offset);
    }

    fn set_panel_flags(&mut self, popup: PopupHandle, flags: PanelFlags) {
        self.0.borrow_mut().set_panel_flags(popup, flags);
    }

    fn flush_layout(&mut self) {
        self.0.borrow_mut().flush_layout();
    }

    fn marker_rect(&self, marker: MarkerHandle) -> Rect {
        self.0.borrow().marker_rect(marker)
    }

    fn wrapper_rect(&self, popup: PopupHandle) -> Rect {
        self.0.borrow().wrapper_rect(popup)
    }

    fn panel_heights(&self, popup: PopupHandle) -> PanelHeights {
        self.0.borrow().panel_heights(popup)
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        self.0.borrow_mut().set_scroll_lock(locked);
    }

    fn request_frame(&mut self) -> FrameId {
        self.0.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.0.borrow_mut().cancel_frame(frame);
    }

    fn arm_dismissal(&mut self) -> DismissGuard {
        self.0.borrow_mut().arm_dismissal()
    }

    fn release_dismissal(&mut self, guard: DismissGuard) {
        self.0.borrow_mut().release_dismissal(guard);
    }

    fn observe_panel_size(&mut self, popup: PopupHandle) -> SizeWatch {
        self.0.borrow_mut().observe_panel_size(popup)
    }

    fn unobserve_panel_size(&mut self, watch: SizeWatch) {
        self.0.borrow_mut().unobserve_panel_size(watch);
    }

    fn emit(&mut self, event: FootnoteEvent) {
        self.0.borrow_mut().emit(event);
    }
}
