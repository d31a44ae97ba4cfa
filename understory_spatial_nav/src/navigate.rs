// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate resolver: pick one winner for a directional move.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::Direction;
use crate::distance::Distances;
use crate::partition::partition;
use crate::rect::{Geometry, NavRect, measure};
use crate::strategy::{Tier, tiers};

/// A remembered directional move.
///
/// Recorded after `source` moved to `destination`. If a later move starts from `destination`
/// in `reverse` and `source` competes in the winning tier, `source` wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Previous<K> {
    /// Where the recorded move started.
    pub source: K,
    /// Where the recorded move landed.
    pub destination: K,
    /// The direction that undoes the recorded move.
    pub reverse: Direction,
}

/// Tuning for a single [`navigate`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct NavOptions<K> {
    /// Drop the diagonal tier.
    pub straight_only: bool,
    /// Fraction of the target's span a corner candidate must cover to also count as
    /// adjacent. Expected in `[0, 1]`.
    pub straight_overlap_threshold: f64,
    /// Honor [`NavOptions::previous`].
    pub remember_source: bool,
    /// The last recorded move, if any.
    pub previous: Option<Previous<K>>,
}

impl<K> Default for NavOptions<K> {
    fn default() -> Self {
        Self {
            straight_only: false,
            straight_overlap_threshold: 0.5,
            remember_source: false,
            previous: None,
        }
    }
}

/// Select the best candidate to receive focus when moving from `target` in `direction`.
///
/// Returns `None` when `candidates` is empty, when neither any candidate nor the target can
/// be measured, or when no candidate lies in a usable tier. The function is pure: identical
/// geometry and options always yield the same answer.
///
/// Steps:
/// 1. Measure the target and every candidate; unmeasurable candidates are skipped.
/// 2. Partition candidates around the target's bounds, then re-partition the center bucket
///    around the target's center point.
/// 3. Build the tiers for `direction` and keep the first non-empty one.
/// 4. Stable-sort it by its tie-breakers, lexicographically.
/// 5. Return the first member, unless a valid remembered move names a member of the tier.
pub fn navigate<K>(
    target: K,
    direction: Direction,
    candidates: &[K],
    geometry: &impl Geometry<K>,
    options: &NavOptions<K>,
) -> Option<K>
where
    K: Copy + Eq,
{
    if candidates.is_empty() {
        return None;
    }
    let rects: Vec<NavRect<K>> = candidates
        .iter()
        .filter_map(|&c| measure(c, geometry))
        .collect();
    if rects.is_empty() {
        return None;
    }
    let target_rect = measure(target, geometry)?;

    let threshold = options.straight_overlap_threshold;
    let outer = partition(&rects, target_rect.bounds(), threshold);
    let inner = partition(
        outer.center().iter().copied(),
        target_rect.center_span(),
        threshold,
    );

    let mut tier = tiers(direction, &outer, &inner, options.straight_only)
        .into_iter()
        .find(|t| !t.members.is_empty())?;
    rank(&mut tier, &Distances::new(&target_rect));

    if options.remember_source {
        let restored = options
            .previous
            .filter(|p| p.destination == target && p.reverse == direction)
            .and_then(|p| tier.members.iter().find(|r| r.id == p.source));
        if let Some(rect) = restored {
            return Some(rect.id);
        }
    }
    tier.members.first().map(|r| r.id)
}

fn rank<K>(tier: &mut Tier<'_, K>, distances: &Distances) {
    let metrics = tier.tie_breakers;
    tier.members.sort_by(|a, b| {
        for &metric in metrics {
            let delta = distances.eval(metric, a) - distances.eval(metric, b);
            // NaN deltas do not decide; move on to the next metric.
            if delta < 0.0 {
                return Ordering::Less;
            }
            if delta > 0.0 {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    });
}
