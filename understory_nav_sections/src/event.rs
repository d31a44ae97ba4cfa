// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications sent to the host around every focus transition.
//!
//! A directional move emits, in order:
//!
//! ```text
//! willmove → willunfocus → unfocused → willfocus → focused
//! ```
//!
//! `willunfocus` and `unfocused` only appear when something was focused. The `will*` events
//! are cancelable: the host's [`Approval`] decides whether the transition continues. When a
//! directional move cannot complete, a single non-cancelable `navigatefailed` is sent instead
//! and focus stays where it was.

use alloc::string::String;

use understory_spatial_nav::Direction;

use crate::SectionId;

/// Kind of a [`NavEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A directional move is about to run.
    WillMove,
    /// The focused element is about to lose focus.
    WillUnfocus,
    /// The focused element lost focus.
    Unfocused,
    /// An element is about to gain focus.
    WillFocus,
    /// An element gained focus.
    Focused,
    /// A directional move found no legal destination or was vetoed.
    NavigateFailed,
    /// Enter was pressed on a sectioned element.
    EnterDown,
    /// Enter was released on a sectioned element.
    EnterUp,
}

impl EventKind {
    /// Event name without the configured prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WillMove => "willmove",
            Self::WillUnfocus => "willunfocus",
            Self::Unfocused => "unfocused",
            Self::WillFocus => "willfocus",
            Self::Focused => "focused",
            Self::NavigateFailed => "navigatefailed",
            Self::EnterDown => "enter-down",
            Self::EnterUp => "enter-up",
        }
    }

    /// Whether a veto from the host aborts the transition.
    pub const fn is_cancelable(self) -> bool {
        matches!(
            self,
            Self::WillMove | Self::WillUnfocus | Self::WillFocus | Self::EnterDown | Self::EnterUp
        )
    }
}

/// What started a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A key press or d-pad input.
    Device,
    /// A call such as [`Navigator::focus`](crate::Navigator::focus).
    Api,
    /// Focus moved outside the navigator (a pointer click, say) and was reported back.
    Native,
}

/// The host's answer to a cancelable event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Approval {
    /// Let the transition continue.
    #[default]
    Granted,
    /// Abort the transition with no state change.
    Vetoed,
}

/// A notification delivered through [`FocusHost::notify`](crate::FocusHost::notify).
#[derive(Clone, Debug, PartialEq)]
pub struct NavEvent<K> {
    /// Kind of event.
    pub kind: EventKind,
    /// Full event name: the configured event prefix followed by [`EventKind::as_str`].
    pub name: String,
    /// Element the event is dispatched on.
    pub element: K,
    /// Whether a veto is honored.
    pub cancelable: bool,
    /// What started the transition.
    pub cause: Cause,
    /// Direction of the move, when there is one.
    pub direction: Option<Direction>,
    /// Section of [`NavEvent::element`].
    pub section_id: Option<SectionId>,
    /// The other element involved: the next element while unfocusing, the previous one
    /// while focusing.
    pub related_element: Option<K>,
    /// Section of [`NavEvent::related_element`].
    pub related_section_id: Option<SectionId>,
}

impl<K> NavEvent<K> {
    pub(crate) fn new(prefix: &str, kind: EventKind, element: K, cause: Cause) -> Self {
        let mut name = String::with_capacity(prefix.len() + kind.as_str().len());
        name.push_str(prefix);
        name.push_str(kind.as_str());
        Self {
            kind,
            name,
            element,
            cancelable: kind.is_cancelable(),
            cause,
            direction: None,
            section_id: None,
            related_element: None,
            related_section_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_carry_the_prefix() {
        let ev = NavEvent::new("sn:", EventKind::NavigateFailed, 3_u32, Cause::Device);
        assert_eq!(ev.name, "sn:navigatefailed");
        assert!(!ev.cancelable);
        let ev = NavEvent::new("", EventKind::EnterDown, 3_u32, Cause::Device);
        assert_eq!(ev.name, "enter-down");
        assert!(ev.cancelable);
    }
}
