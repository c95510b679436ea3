// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open, position, and re-toggle a footnote against a console host.
//!
//! The host prints every document operation the controllers request, and
//! serves back fixed geometry so the deferred measurement produces a real
//! offset.
//!
//! Run:
//! - `cargo run -p marginalia_demos --example footnote_basics`

use kurbo::Rect;
use marginalia_footnote::{
    DismissGuard, FootnoteEvent, Footnotes, FrameId, Host, MarkerVisual, PanelFlags, PanelHeights,
    PanelSpec, SizeWatch,
};
use marginalia_registry::{MarkerHandle, PopupHandle};

/// Prints every requested operation; geometry comes from fixed slots laid
/// out 180px apart.
struct ConsoleHost {
    next_token: u64,
    pending_frame: Option<FrameId>,
}

impl ConsoleHost {
    fn new() -> Self {
        Self {
            next_token: 0,
            pending_frame: None,
        }
    }

    fn mint(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Host for ConsoleHost {
    fn init_marker(&mut self, marker: MarkerHandle) {
        println!("host: split {marker:?} into label + button");
    }

    fn teardown_marker(&mut self, marker: MarkerHandle) {
        println!("host: remove button of {marker:?}");
    }

    fn apply_marker(&mut self, marker: MarkerHandle, visual: &MarkerVisual) {
        println!(
            "host: {marker:?} numeral={} expanded={} controls={}",
            visual.numeral, visual.expanded, visual.controls
        );
    }

    fn init_popup(&mut self, popup: PopupHandle) {
        println!("host: wrap content of {popup:?}");
    }

    fn teardown_popup(&mut self, popup: PopupHandle) {
        println!("host: unwrap content of {popup:?}");
    }

    fn build_panel(&mut self, popup: PopupHandle, spec: &PanelSpec) {
        println!("host: build panel #{} for {popup:?}", spec.dom_id);
    }

    fn destroy_panel(&mut self, popup: PopupHandle) {
        println!("host: destroy panel of {popup:?}");
    }

    fn set_panel_offset(&mut self, popup: PopupHandle, offset: f64) {
        println!("host: {popup:?} --top: {offset}px");
    }

    fn set_panel_flags(&mut self, popup: PopupHandle, flags: PanelFlags) {
        println!("host: {popup:?} classes {flags:?}");
    }

    fn flush_layout(&mut self) {}

    fn marker_rect(&self, _marker: MarkerHandle) -> Rect {
        // Second paragraph of the running text.
        Rect::new(40.0, 360.0, 58.0, 378.0)
    }

    fn wrapper_rect(&self, _popup: PopupHandle) -> Rect {
        // Wrappers sit in the footnote column below the text.
        Rect::new(0.0, 180.0, 320.0, 180.0)
    }

    fn panel_heights(&self, _popup: PopupHandle) -> PanelHeights {
        PanelHeights {
            content: 140.0,
            visible: 200.0,
        }
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        println!("host: scroll lock {locked}");
    }

    fn request_frame(&mut self) -> FrameId {
        let frame = FrameId::new(self.mint());
        self.pending_frame = Some(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        if self.pending_frame == Some(frame) {
            self.pending_frame = None;
        }
    }

    fn arm_dismissal(&mut self) -> DismissGuard {
        println!("host: arm document click/key listeners");
        DismissGuard::new(self.mint())
    }

    fn release_dismissal(&mut self, _guard: DismissGuard) {
        println!("host: release document click/key listeners");
    }

    fn observe_panel_size(&mut self, _popup: PopupHandle) -> SizeWatch {
        SizeWatch::new(self.mint())
    }

    fn unobserve_panel_size(&mut self, _watch: SizeWatch) {}

    fn emit(&mut self, event: FootnoteEvent) {
        println!("event: {event:?}");
    }
}

fn main() {
    let mut footnotes = Footnotes::new(ConsoleHost::new());

    // Three footnotes in document order.
    let markers: Vec<_> = (0..3).map(|_| footnotes.create_marker()).collect();
    for _ in 0..3 {
        footnotes.create_popup();
    }

    println!("\n== toggle the second footnote ==");
    footnotes.toggle(markers[1]);

    // The platform's animation frame fires; position is measured now.
    if let Some(frame) = footnotes.host().pending_frame {
        println!("\n== frame fires ==");
        footnotes.frame(frame);
    }

    println!("\n== re-toggle closes it ==");
    footnotes.toggle(markers[1]);

    assert_eq!(footnotes.registry().open_index(), None);
}
