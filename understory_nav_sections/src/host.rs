// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: everything the navigator needs from the surrounding UI.

use alloc::vec::Vec;

use kurbo::Rect;
use understory_spatial_nav::Direction;

use crate::config::Exit;
use crate::event::{Approval, NavEvent};

bitflags::bitflags! {
    /// Element state reported by the host.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered and has a non-empty box.
        const VISIBLE   = 0b0000_0001;
        /// Element accepts input.
        const ENABLED   = 0b0000_0010;
        /// Element can receive platform focus without help.
        const FOCUSABLE = 0b0000_0100;
    }
}

impl ElementFlags {
    /// Flags an element needs to be a navigation candidate.
    pub const NAVIGABLE: Self = Self::VISIBLE.union(Self::ENABLED);
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::NAVIGABLE
    }
}

/// The UI surface a [`Navigator`](crate::Navigator) drives.
///
/// Selectors are opaque: the navigator only ever passes strings it was configured with back
/// to [`FocusHost::query`] and [`FocusHost::matches`]. Element handles are small copyable ids
/// owned by the host; the navigator never assumes an element still exists and asks again
/// every time it needs geometry or state.
pub trait FocusHost<K>
where
    K: Copy + Eq,
{
    /// Elements matching `selector`, in document order. Unknown selectors yield nothing.
    fn query(&self, selector: &str) -> Vec<K>;

    /// Whether `element` matches `selector`.
    fn matches(&self, element: K, selector: &str) -> bool {
        self.query(selector).contains(&element)
    }

    /// Bounding box of `element` in the shared coordinate space.
    fn bounds(&self, element: K) -> Option<Rect>;

    /// Current state of `element`.
    fn flags(&self, element: K) -> ElementFlags;

    /// The element that currently has platform focus.
    fn focused(&self) -> Option<K>;

    /// Give `element` platform focus.
    fn apply_focus(&mut self, element: K);

    /// Take platform focus away from `element`.
    fn blur(&mut self, element: K) {
        let _ = element;
    }

    /// Make `element` focusable (for example by giving it a tab index).
    fn make_focusable(&mut self, element: K) {
        let _ = element;
    }

    /// A per-element exit for `direction`, consulted before any geometry.
    fn element_override(&self, element: K, direction: Direction) -> Option<Exit<K>> {
        let _ = (element, direction);
        None
    }

    /// Deliver a notification. The answer is ignored for non-cancelable events.
    fn notify(&mut self, event: &NavEvent<K>) -> Approval {
        let _ = event;
        Approval::Granted
    }
}
