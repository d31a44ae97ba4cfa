// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial partitioner: a 3×3 grid of buckets around a target span.
//!
//! Buckets are numbered row-major:
//!
//! ```text
//! 0 | 1 | 2
//! --+---+--
//! 3 | 4 | 5
//! --+---+--
//! 6 | 7 | 8
//! ```
//!
//! Every candidate lands in exactly one *home* bucket chosen by comparing its center with the
//! target's horizontal and vertical span. Centers on a boundary count as within the span.
//!
//! Candidates whose home is a corner bucket may also be copied into the adjacent edge
//! buckets. This happens when the candidate covers at least `threshold` of the target's
//! width (for the top/bottom edge) or height (for the left/right edge). A candidate can
//! therefore appear in up to three buckets and compete in more than one tier.

use alloc::vec::Vec;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::rect::NavRect;

pub(crate) const TOP_LEFT: usize = 0;
pub(crate) const TOP: usize = 1;
pub(crate) const TOP_RIGHT: usize = 2;
pub(crate) const LEFT: usize = 3;
pub(crate) const CENTER: usize = 4;
pub(crate) const RIGHT: usize = 5;
pub(crate) const BOTTOM_LEFT: usize = 6;
pub(crate) const BOTTOM: usize = 7;
pub(crate) const BOTTOM_RIGHT: usize = 8;

type Bucket<'a, K> = SmallVec<[&'a NavRect<K>; 4]>;

/// Nine buckets of candidates produced by [`partition`].
#[derive(Clone, Debug)]
pub struct Partition<'a, K> {
    buckets: [Bucket<'a, K>; 9],
}

impl<'a, K> Partition<'a, K> {
    /// Members of bucket `index` (`0..9`), in discovery order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 9`.
    pub fn bucket(&self, index: usize) -> &[&'a NavRect<K>] {
        &self.buckets[index]
    }

    /// Members of the center bucket (index 4).
    ///
    /// The center bucket is never a destination on its own; it seeds the interior pass.
    pub fn center(&self) -> &[&'a NavRect<K>] {
        self.bucket(CENTER)
    }

    /// Concatenate the given buckets in order.
    pub(crate) fn gather(&self, indices: &[usize]) -> Vec<&'a NavRect<K>> {
        indices
            .iter()
            .flat_map(|&i| self.buckets[i].iter().copied())
            .collect()
    }
}

/// Partition `candidates` into nine buckets relative to `target`.
///
/// `threshold` is the fraction of the target's width or height a corner candidate must cover
/// to be duplicated into the neighbouring edge bucket. With a zero-width (or zero-height)
/// target, a corner candidate duplicates when it reaches across the target's line.
///
/// An empty candidate set yields nine empty buckets.
pub fn partition<'a, K: 'a>(
    candidates: impl IntoIterator<Item = &'a NavRect<K>>,
    target: Rect,
    threshold: f64,
) -> Partition<'a, K> {
    let mut buckets: [Bucket<'a, K>; 9] = core::array::from_fn(|_| SmallVec::new());
    let width = target.width();
    let height = target.height();

    for rect in candidates {
        let col = if rect.center.x < target.x0 {
            0
        } else if rect.center.x <= target.x1 {
            1
        } else {
            2
        };
        let row = if rect.center.y < target.y0 {
            0
        } else if rect.center.y <= target.y1 {
            1
        } else {
            2
        };
        let home = row * 3 + col;
        buckets[home].push(rect);

        if !matches!(home, TOP_LEFT | TOP_RIGHT | BOTTOM_LEFT | BOTTOM_RIGHT) {
            continue;
        }

        if rect.left <= target.x1 - width * threshold {
            match home {
                TOP_RIGHT => buckets[TOP].push(rect),
                BOTTOM_RIGHT => buckets[BOTTOM].push(rect),
                _ => {}
            }
        }
        if rect.right >= target.x0 + width * threshold {
            match home {
                TOP_LEFT => buckets[TOP].push(rect),
                BOTTOM_LEFT => buckets[BOTTOM].push(rect),
                _ => {}
            }
        }
        if rect.top <= target.y1 - height * threshold {
            match home {
                BOTTOM_LEFT => buckets[LEFT].push(rect),
                BOTTOM_RIGHT => buckets[RIGHT].push(rect),
                _ => {}
            }
        }
        if rect.bottom >= target.y0 + height * threshold {
            match home {
                TOP_LEFT => buckets[LEFT].push(rect),
                TOP_RIGHT => buckets[RIGHT].push(rect),
                _ => {}
            }
        }
    }

    Partition { buckets }
}
