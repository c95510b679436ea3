// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the controllers: numbering, visual state, events, hits,
//! and the scoped resource tokens handed out by a [`Host`](crate::host::Host).

use alloc::format;
use alloc::string::{String, ToString};

use marginalia_registry::{MarkerHandle, PopupHandle};

/// First index rendered with the wide-numeral treatment.
///
/// Indices 0..=8 produce single-digit numerals; from index 9 the numeral "10"
/// is still narrow enough in practice, so the threshold sits at index 10
/// (numeral "11"), matching the presentation layer's badge sizing.
pub const WIDE_NUMERAL_MIN: usize = 10;

/// 1-based footnote numeral for a 0-based index.
///
/// ```
/// assert_eq!(marginalia_footnote::symbol(0), "1");
/// assert_eq!(marginalia_footnote::symbol(10), "11");
/// ```
pub fn symbol(index: usize) -> String {
    (index + 1).to_string()
}

/// DOM id of the rendered panel for the footnote at `index`.
///
/// Used both as the panel's own id and as the marker button's
/// `aria-controls` reference, so the two stay paired.
pub fn panel_id(index: usize) -> String {
    format!("footnote-{index}")
}

bitflags::bitflags! {
    /// Visual state classes on a marker button.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MarkerFlags: u8 {
        /// This marker's footnote is the open one.
        const OPEN = 0b0000_0001;
        /// Numeral has two or more digits past the wide threshold.
        const WIDE = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Visual state classes on a rendered panel.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PanelFlags: u8 {
        /// Panel content overflows its visible height.
        const SCROLLABLE = 0b0000_0001;
        /// Panel numeral badge uses the wide treatment.
        const WIDE_NUMERAL = 0b0000_0010;
    }
}

/// Everything the host needs to render one marker, pushed on every sync pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerVisual {
    /// 1-based numeral text for the marker button.
    pub numeral: String,
    /// Expanded-state flag (`aria-expanded`).
    pub expanded: bool,
    /// Identifier of the controlled panel (`aria-controls`).
    pub controls: String,
    /// Visual state classes.
    pub flags: MarkerFlags,
}

/// Everything the host needs to build a popup panel.
///
/// The host clones the wrapper's original content into a dialog-role panel
/// with this id, appends a dismiss control, stamps `numeral` onto the first
/// content block, and applies the wide treatment when `wide` is set. It is
/// expected to save and restore the page scroll position around insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelSpec {
    /// Index of the footnote at build time.
    pub index: usize,
    /// 1-based numeral badge for the first content block.
    pub numeral: String,
    /// DOM id for the panel, paired with the marker's `aria-controls`.
    pub dom_id: String,
    /// Whether the numeral badge uses the wide treatment.
    pub wide: bool,
}

impl PanelSpec {
    /// Build the spec for the footnote at `index`.
    pub fn for_index(index: usize) -> Self {
        Self {
            index,
            numeral: symbol(index),
            dom_id: panel_id(index),
            wide: index >= WIDE_NUMERAL_MIN,
        }
    }
}

/// Content heights of a rendered panel, as measured by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PanelHeights {
    /// Full content height.
    pub content: f64,
    /// Visible (clipped) height.
    pub visible: f64,
}

impl PanelHeights {
    /// Whether the content overflows the visible area.
    pub fn overflows(&self) -> bool {
        self.content > self.visible
    }
}

/// Interaction events, emitted through the host for page-level scripts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FootnoteEvent {
    /// A marker was toggled. `open` is the state after the toggle.
    Toggle {
        /// Index of the toggled marker.
        index: usize,
        /// Whether the footnote is now open.
        open: bool,
    },
    /// The open popup was closed through a dismissal path.
    Close {
        /// Index of the closed footnote.
        index: usize,
    },
}

/// Pre-resolved containment for one capture-phase document click.
///
/// Hit resolution is the caller's job: report which registered marker and
/// which rendered panel (if any) contain the click target, and feed the
/// result to [`Footnotes::document_click`](crate::Footnotes::document_click).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickHit {
    /// Marker whose region contains the target, if any.
    pub marker: Option<MarkerHandle>,
    /// Popup whose rendered panel contains the target, if any.
    pub panel: Option<PopupHandle>,
}

impl ClickHit {
    /// A click outside every marker and every panel.
    pub fn outside() -> Self {
        Self::default()
    }

    /// A click inside the region of `marker`.
    pub fn on_marker(marker: MarkerHandle) -> Self {
        Self {
            marker: Some(marker),
            panel: None,
        }
    }

    /// A click inside the rendered panel of `popup`.
    pub fn in_panel(popup: PopupHandle) -> Self {
        Self {
            marker: None,
            panel: Some(popup),
        }
    }
}

/// Identifier for one scheduled rendering frame.
///
/// Minted by [`Host::request_frame`](crate::host::Host::request_frame); the
/// platform passes it back to [`Footnotes::frame`](crate::Footnotes::frame)
/// when the frame fires. A cancelled or stale id is ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    /// Wrap a host-chosen raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Token for armed document-level dismissal listeners.
///
/// Handed out by [`Host::arm_dismissal`](crate::host::Host::arm_dismissal) and
/// returned through [`Host::release_dismissal`](crate::host::Host::release_dismissal)
/// on every close path, so listeners cannot leak.
#[must_use = "dismissal listeners stay armed until the guard is released"]
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct DismissGuard(u64);

impl DismissGuard {
    /// Wrap a host-chosen raw token.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Unwrap the raw token.
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// Token for an active panel size observation.
///
/// Handed out by [`Host::observe_panel_size`](crate::host::Host::observe_panel_size)
/// and returned through
/// [`Host::unobserve_panel_size`](crate::host::Host::unobserve_panel_size).
#[must_use = "size observation stays active until the watch is returned"]
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct SizeWatch(u64);

impl SizeWatch {
    /// Wrap a host-chosen raw token.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Unwrap the raw token.
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_one_based() {
        assert_eq!(symbol(0), "1");
        assert_eq!(symbol(9), "10");
        assert_eq!(symbol(10), "11");
    }

    // Wide treatment activates exactly at the threshold.
    #[test]
    fn panel_spec_wide_threshold() {
        assert!(!PanelSpec::for_index(9).wide);
        assert!(PanelSpec::for_index(10).wide);
        assert_eq!(PanelSpec::for_index(10).numeral, "11");
        assert_eq!(PanelSpec::for_index(3).dom_id, "footnote-3");
    }

    #[test]
    fn panel_heights_overflow() {
        let fits = PanelHeights {
            content: 100.0,
            visible: 100.0,
        };
        assert!(!fits.overflows());
        let overflowing = PanelHeights {
            content: 180.0,
            visible: 120.0,
        };
        assert!(overflowing.overflows());
    }
}
