// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_nav_sections --heading-base-level=0

//! Understory Nav Sections: section registry and focus state machine for d-pad navigation.
//!
//! This crate wraps the geometric ranking of `understory_spatial_nav` in the bookkeeping a
//! real interface needs:
//! - **Sections** ([`Section`]): named groups of elements, each with its own policy for
//!   staying inside ([`Restrict`]), leaving ([`LeaveFor`]), and being entered ([`EnterTo`]).
//!   Settings a section does not override fall back to the [`GlobalConfig`] field by field
//!   ([`EffectiveConfig`]).
//! - A **registry** ([`Registry`]) that owns the sections and generates ids.
//! - A **host seam** ([`FocusHost`]) through which the navigator queries selectors,
//!   geometry, and element state, moves platform focus, and sends notifications.
//! - The **navigator** ([`Navigator`]) that runs directional moves, resolves section entry,
//!   and drives the cancelable approval protocol ([`NavEvent`], [`Approval`]).
//! - **Key bindings** ([`Navigator::on_key_down`], [`Key`]) and reconciliation with focus
//!   changes made outside the navigator ([`Navigator::on_focus`], [`Navigator::on_blur`]).
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_nav_sections::{
//!     ConfigPatch, Direction, ElementFlags, Field, FocusHost, Navigator, Target,
//! };
//!
//! struct Row {
//!     boxes: Vec<Rect>,
//!     focused: Option<usize>,
//! }
//!
//! impl FocusHost<usize> for Row {
//!     fn query(&self, selector: &str) -> Vec<usize> {
//!         if selector == ".cell" { (0..self.boxes.len()).collect() } else { Vec::new() }
//!     }
//!     fn bounds(&self, el: usize) -> Option<Rect> { self.boxes.get(el).copied() }
//!     fn flags(&self, _: usize) -> ElementFlags { ElementFlags::NAVIGABLE }
//!     fn focused(&self) -> Option<usize> { self.focused }
//!     fn apply_focus(&mut self, el: usize) { self.focused = Some(el); }
//! }
//!
//! let host = Row {
//!     boxes: vec![Rect::new(0.0, 0.0, 50.0, 50.0), Rect::new(100.0, 0.0, 150.0, 50.0)],
//!     focused: None,
//! };
//! let mut nav = Navigator::new(host);
//! nav.register(Some("row"), ConfigPatch {
//!     selector: Field::Set(".cell".into()),
//!     ..ConfigPatch::default()
//! })
//! .unwrap();
//!
//! assert!(nav.focus(Some(&Target::Element(0)), false));
//! assert!(nav.move_focus(Direction::Right, None));
//! assert_eq!(nav.host().focused, Some(1));
//! // Nothing further right: a routine failure, not an error.
//! assert!(!nav.move_focus(Direction::Right, None));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies and the thread-local
//!   [`ambient`] navigator.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `tracing`: emits `tracing` events for registry changes, committed focus moves, vetoes,
//!   and failed navigation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
pub mod ambient;
mod config;
mod error;
mod event;
mod host;
mod input;
mod navigator;
mod registry;
mod section;
#[cfg(test)]
mod testing;

pub use config::{
    ConfigPatch, DEFAULT_EVENT_PREFIX, DEFAULT_ID_PREFIX, DEFAULT_TAB_INDEX_IGNORE,
    EffectiveConfig, EnterTo, Exit, Field, GlobalConfig, LeaveFor, NavigableFilter, Restrict,
    Settings, Target,
};
pub use error::SectionError;
pub use event::{Approval, Cause, EventKind, NavEvent};
pub use host::{ElementFlags, FocusHost};
pub use input::{Key, KeyOutcome, Modifiers};
pub use navigator::Navigator;
pub use registry::Registry;
pub use section::Section;
pub use understory_spatial_nav::{Direction, Previous};

/// Identifier of a registered section.
pub type SectionId = alloc::string::String;
