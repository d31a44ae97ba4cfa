// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input accepted by [`Navigator::on_key_down`](crate::Navigator::on_key_down).

use understory_spatial_nav::Direction;

/// A key as seen by the navigator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// An arrow key or d-pad press.
    Arrow(Direction),
    /// The confirm key.
    Enter,
    /// Anything else; always ignored.
    Other,
}

impl Key {
    /// Map a legacy DOM-style key code: 37–40 are the arrows, 13 is Enter.
    pub const fn from_code(code: u32) -> Self {
        match code {
            37 => Self::Arrow(Direction::Left),
            38 => Self::Arrow(Direction::Up),
            39 => Self::Arrow(Direction::Right),
            40 => Self::Arrow(Direction::Down),
            13 => Self::Enter,
            _ => Self::Other,
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key event. Any modifier disables navigation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Meta / Command / Windows.
        const META  = 0b0000_0100;
        /// Shift.
        const SHIFT = 0b0000_1000;
    }
}

/// What the caller should do with a key event after the navigator has seen it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The navigator did not handle the key; let it through.
    Ignored,
    /// The navigator handled the key; suppress the platform default.
    Consumed,
}
