// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_spatial_nav --heading-base-level=0

//! Understory Spatial Nav: geometry-based directional focus ranking.
//!
//! This crate answers a single question for four-way input devices (arrow keys, a remote
//! control d-pad): *given the focused region and a direction, which candidate region should
//! receive focus next?*
//!
//! The decision is built from a few small pieces:
//! - A **rectangle model** ([`NavRect`]) that normalizes a region's bounds and derives its
//!   center. Bounds come from a [`Geometry`] source and are measured fresh on every call.
//! - A **spatial partitioner** ([`partition`]) that sorts candidates into a 3×3 grid around
//!   the target. Corner candidates that overlap the target's span enough are duplicated into
//!   the neighbouring edge bucket.
//! - **Distance metrics** ([`Distances`], [`Metric`]) evaluated against the target.
//! - A **directional strategy** ([`tiers`]) that turns the buckets into three ranked tiers:
//!   interior, adjacent, and diagonal.
//! - The **resolver** ([`navigate`]) that picks the first non-empty tier, sorts it, and
//!   optionally restores a remembered source when the user reverses direction.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_spatial_nav::{Direction, NavOptions, navigate};
//!
//! let layout = [
//!     (1_u32, Rect::new(0.0, 0.0, 50.0, 50.0)),
//!     (2, Rect::new(100.0, 0.0, 150.0, 50.0)),
//!     (3, Rect::new(0.0, 100.0, 50.0, 150.0)),
//! ];
//! let geometry = |id: u32| layout.iter().find(|(k, _)| *k == id).map(|(_, r)| *r);
//! let options = NavOptions::default();
//!
//! assert_eq!(navigate(1, Direction::Right, &[2, 3], &geometry, &options), Some(2));
//! assert_eq!(navigate(1, Direction::Down, &[2, 3], &geometry, &options), Some(3));
//! assert_eq!(navigate(1, Direction::Left, &[2, 3], &geometry, &options), None);
//! ```
//!
//! Sections, focus bookkeeping, and the approval protocol around a focus change live in
//! `understory_nav_sections`; this crate is only the pure ranking step.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod distance;
mod navigate;
mod partition;
mod rect;
mod strategy;

use core::fmt;
use core::str::FromStr;

pub use distance::{Distances, Metric};
pub use navigate::{NavOptions, Previous, navigate};
pub use partition::{Partition, partition};
pub use rect::{Geometry, NavRect, measure};
pub use strategy::{Tier, tiers};

/// Direction of a four-way navigation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller x.
    Left,
    /// Toward smaller y.
    Up,
    /// Toward larger x.
    Right,
    /// Toward larger y.
    Down,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// The opposite direction.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Lowercase name, as used in configuration and event details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
        }
    }

    /// Parse a direction name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Direction`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectionError;

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of \"left\", \"up\", \"right\", \"down\"")
    }
}

impl core::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(ParseDirectionError)
    }
}
