// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marginalia Registry: ordered bookkeeping for footnote markers and popups.
//!
//! The registry is the single source of truth shared by every marker and every
//! popup in a document:
//!
//! - Two ordered sequences of opaque handles, one for markers and one for
//!   popups. A handle's index is always *derived* from its current position in
//!   its sequence; it is never stored, so indices stay correct as earlier
//!   entries come and go.
//! - A single nullable open index. At most one footnote is open at a time.
//! - An ordered subscriber list. Every mutating call notifies all subscribers
//!   synchronously, in registration order, after state is fully updated.
//!
//! ## Ordering
//!
//! Markers and popups are expected to register in matching document order, so
//! marker *i* and popup *i* are the same logical footnote. Unregistering a
//! marker below the open index shifts the open index down by one; unregistering
//! the open marker clears it. Popup unregistration never rebalances.
//!
//! ## Notification
//!
//! Subscribers receive a borrowed [`RegistryView`] of the post-mutation state
//! and return a `Result`. A failing subscriber is logged and skipped; it does
//! not stop later subscribers and cannot corrupt registry state.
//!
//! # Example
//!
//! ```rust
//! use marginalia_registry::Registry;
//!
//! let mut registry = Registry::new();
//! let m0 = registry.register_marker();
//! let m1 = registry.register_marker();
//! let _p0 = registry.register_popup();
//! let _p1 = registry.register_popup();
//!
//! // Watch for changes.
//! let id = registry.subscribe(Box::new(|view| {
//!     let _ = view.open();
//!     Ok(())
//! }));
//!
//! registry.set_open_index(Some(1));
//! assert_eq!(registry.marker_index(m1), Some(1));
//!
//! // Removing an earlier marker shifts the open index down by one.
//! registry.unregister_marker(m0);
//! assert_eq!(registry.open_index(), Some(0));
//!
//! registry.unsubscribe(id);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod registry;
pub mod types;

pub use registry::{Registry, RegistryView, SubscriberFn};
pub use types::{MarkerHandle, PopupHandle, SubscriberError, SubscriberId};
