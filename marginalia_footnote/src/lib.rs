// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marginalia Footnote: inline footnote markers with positioned popups.
//!
//! ## Overview
//!
//! Markers render as auto-numbered buttons inside long-form content; toggling
//! one reveals a positioned popup with the referenced text. At most one
//! footnote is open at a time, and the open popup dismisses on outside
//! interaction, escape, or re-toggle.
//!
//! This crate holds the per-footnote controllers and their owning composition
//! layer. The shared bookkeeping lives in [`marginalia_registry`]; everything
//! the controllers need from a document — DOM surgery, measurement, frame
//! scheduling, dismissal listeners — goes through the [`Host`] trait, so the
//! whole state machine runs unchanged against a browser binding, a test
//! double, or a headless renderer.
//!
//! ## Control flow
//!
//! A marker click mutates the registry's open index; the composition layer
//! then runs one synchronous pass in which every marker re-renders its
//! numeral and expanded state and every popup steps its open/close state
//! machine. Opening builds the panel lazily and defers position measurement
//! by one rendering frame so layout can settle; closing cancels that frame,
//! releases the dismissal listeners and size observation, and clears the page
//! scroll lock.
//!
//! ## Workflow
//!
//! 1) Construct [`Footnotes`] over your [`Host`] implementation.
//! 2) Create marker/popup pairs in document order with
//!    [`Footnotes::create_marker`] and [`Footnotes::create_popup`].
//! 3) Feed interaction into it: marker clicks via [`Footnotes::toggle`],
//!    capture-phase document clicks as pre-resolved [`ClickHit`]s via
//!    [`Footnotes::document_click`], escape via [`Footnotes::escape`], fired
//!    frames via [`Footnotes::frame`], and panel size changes via
//!    [`Footnotes::panel_resized`].
//!
//! # Example
//!
//! ```rust
//! use marginalia_footnote::{ClickHit, Footnotes, NoopHost};
//!
//! let mut footnotes = Footnotes::new(NoopHost::new());
//! let first = footnotes.create_marker();
//! let second = footnotes.create_marker();
//! let _p0 = footnotes.create_popup();
//! let _p1 = footnotes.create_popup();
//!
//! footnotes.toggle(second);
//! assert_eq!(footnotes.registry().open_index(), Some(1));
//! assert!(footnotes.marker(second).is_some_and(|m| m.is_open(footnotes.registry())));
//! assert!(!footnotes.marker(first).is_some_and(|m| m.is_open(footnotes.registry())));
//!
//! // A click outside every marker and the open panel dismisses.
//! assert!(footnotes.document_click(ClickHit::outside()));
//! assert_eq!(footnotes.registry().open_index(), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod footnotes;
pub mod host;
pub mod marker;
pub mod popup;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use footnotes::Footnotes;
pub use host::{Host, NoopHost};
pub use marker::MarkerController;
pub use popup::PopupController;
pub use types::{
    ClickHit, DismissGuard, FootnoteEvent, FrameId, MarkerFlags, MarkerVisual, PanelFlags,
    PanelHeights, PanelSpec, SizeWatch, WIDE_NUMERAL_MIN, panel_id, symbol,
};
