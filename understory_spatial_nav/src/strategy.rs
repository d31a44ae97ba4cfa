// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional priority strategy: three ranked tiers per direction.
//!
//! For a move in direction `d` the tiers are, from most to least preferred:
//!
//! 1. **Interior**: candidates overlapping the target whose centers lie on the `d` side of
//!    the target's own center (the second, inner partition pass).
//! 2. **Adjacent**: candidates in the single edge bucket directly toward `d`.
//! 3. **Diagonal**: candidates in the two corner buckets toward `d`. Dropped entirely when
//!    straight-only navigation is requested.
//!
//! Alignment with the target's own row or column beats mere adjacency, which beats diagonal
//! placement.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::Direction;
use crate::distance::Metric;
use crate::partition::{
    BOTTOM, BOTTOM_LEFT, BOTTOM_RIGHT, LEFT, Partition, RIGHT, TOP, TOP_LEFT, TOP_RIGHT,
};
use crate::rect::NavRect;

/// One ranked group of candidates.
#[derive(Clone, Debug)]
pub struct Tier<'a, K> {
    /// Candidates competing in this tier, in discovery order.
    pub members: Vec<&'a NavRect<K>>,
    /// Metrics applied left to right until one separates two members.
    pub tie_breakers: &'static [Metric],
}

const ALONG_ROW: &[Metric] = &[Metric::NearPlumbLine, Metric::Top];
const ALONG_COLUMN: &[Metric] = &[Metric::NearHorizon, Metric::Left];
const DIAGONAL_LEFT: &[Metric] = &[Metric::NearHorizon, Metric::Right, Metric::NearTargetTop];
const DIAGONAL_RIGHT: &[Metric] = &[Metric::NearHorizon, Metric::Left, Metric::NearTargetTop];
const DIAGONAL_UP: &[Metric] = &[
    Metric::NearPlumbLine,
    Metric::Bottom,
    Metric::NearTargetLeft,
];
const DIAGONAL_DOWN: &[Metric] = &[Metric::NearPlumbLine, Metric::Top, Metric::NearTargetLeft];

struct Layout {
    interior: [usize; 3],
    adjacent: usize,
    diagonal: [usize; 2],
    straight: &'static [Metric],
    oblique: &'static [Metric],
}

const fn layout(direction: Direction) -> Layout {
    match direction {
        Direction::Left => Layout {
            interior: [TOP_LEFT, LEFT, BOTTOM_LEFT],
            adjacent: LEFT,
            diagonal: [TOP_LEFT, BOTTOM_LEFT],
            straight: ALONG_ROW,
            oblique: DIAGONAL_LEFT,
        },
        Direction::Right => Layout {
            interior: [TOP_RIGHT, RIGHT, BOTTOM_RIGHT],
            adjacent: RIGHT,
            diagonal: [TOP_RIGHT, BOTTOM_RIGHT],
            straight: ALONG_ROW,
            oblique: DIAGONAL_RIGHT,
        },
        Direction::Up => Layout {
            interior: [TOP_LEFT, TOP, TOP_RIGHT],
            adjacent: TOP,
            diagonal: [TOP_LEFT, TOP_RIGHT],
            straight: ALONG_COLUMN,
            oblique: DIAGONAL_UP,
        },
        Direction::Down => Layout {
            interior: [BOTTOM_LEFT, BOTTOM, BOTTOM_RIGHT],
            adjacent: BOTTOM,
            diagonal: [BOTTOM_LEFT, BOTTOM_RIGHT],
            straight: ALONG_COLUMN,
            oblique: DIAGONAL_DOWN,
        },
    }
}

/// Build the ordered tiers for `direction`.
///
/// `outer` is the partition of all candidates around the target's bounds; `inner` is the
/// partition of `outer`'s center bucket around the target's center point. The result holds
/// three tiers, or two when `straight_only` is set.
pub fn tiers<'a, K>(
    direction: Direction,
    outer: &Partition<'a, K>,
    inner: &Partition<'a, K>,
    straight_only: bool,
) -> SmallVec<[Tier<'a, K>; 3]> {
    let layout = layout(direction);
    let mut out = SmallVec::new();
    out.push(Tier {
        members: inner.gather(&layout.interior),
        tie_breakers: layout.straight,
    });
    out.push(Tier {
        members: outer.gather(&[layout.adjacent]),
        tie_breakers: layout.straight,
    });
    if !straight_only {
        out.push(Tier {
            members: outer.gather(&layout.diagonal),
            tie_breakers: layout.oblique,
        });
    }
    out
}
