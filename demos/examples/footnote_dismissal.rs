// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissal paths and page-level observation.
//!
//! Opens a footnote, shows that marker and in-panel clicks are left alone,
//! then dismisses by outside click and by escape. A registry subscriber
//! plays the role of a page-level script watching the open index.
//!
//! Run:
//! - `cargo run -p marginalia_demos --example footnote_dismissal`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use marginalia_footnote::{
    ClickHit, DismissGuard, FootnoteEvent, Footnotes, FrameId, Host, MarkerVisual, PanelFlags,
    PanelHeights, PanelSpec, SizeWatch,
};
use marginalia_registry::{MarkerHandle, PopupHandle};

/// Quiet host: fixed geometry, no output.
#[derive(Default)]
struct QuietHost {
    next_token: u64,
    events: Vec<FootnoteEvent>,
}

impl QuietHost {
    fn mint(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Host for QuietHost {
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
        Rect::new(0.0, 120.0, 16.0, 136.0)
    }

    fn wrapper_rect(&self, _popup: PopupHandle) -> Rect {
        Rect::new(0.0, 40.0, 280.0, 40.0)
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

    fn emit(&mut self, event: FootnoteEvent) {
        self.events.push(event);
    }
}

fn main() {
    let mut footnotes = Footnotes::new(QuietHost::default());
    let markers: Vec<_> = (0..2).map(|_| footnotes.create_marker()).collect();
    let popups: Vec<_> = (0..2).map(|_| footnotes.create_popup()).collect();

    // A page-level script watching the open index.
    let observed = Rc::new(RefCell::new(Vec::new()));
    {
        let observed = Rc::clone(&observed);
        footnotes.subscribe(Box::new(move |view| {
            observed.borrow_mut().push(view.open());
            Ok(())
        }));
    }

    footnotes.toggle(markers[0]);

    // Marker and in-panel clicks never dismiss.
    assert!(!footnotes.document_click(ClickHit::on_marker(markers[1])));
    assert!(!footnotes.document_click(ClickHit::in_panel(popups[0])));
    assert_eq!(footnotes.registry().open_index(), Some(0));

    // Outside click dismisses and is consumed.
    assert!(footnotes.document_click(ClickHit::outside()));
    assert_eq!(footnotes.registry().open_index(), None);

    // Escape dismisses too.
    footnotes.toggle(markers[1]);
    footnotes.escape();
    assert_eq!(footnotes.registry().open_index(), None);

    println!("observer saw open index: {:?}", observed.borrow());
    println!("events: {:?}", footnotes.host().events);
}
