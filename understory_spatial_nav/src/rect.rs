// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle model: normalized candidate bounds plus a derived center.

use kurbo::{Point, Rect};

/// Source of region bounds.
///
/// All regions handed to a single [`navigate`](crate::navigate) call must be reported in one
/// shared coordinate space. Returning `None` marks the region as unmeasurable; it is then
/// skipped rather than treated as an error.
///
/// Any `Fn(K) -> Option<Rect>` is a geometry source.
pub trait Geometry<K> {
    /// Current bounds of `id`, or `None` if it has no geometry.
    fn bounds(&self, id: K) -> Option<Rect>;
}

impl<K, F> Geometry<K> for F
where
    F: Fn(K) -> Option<Rect>,
{
    fn bounds(&self, id: K) -> Option<Rect> {
        self(id)
    }
}

/// Normalized geometry of one region.
///
/// Built fresh for each navigation attempt, since layout may change between attempts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavRect<K> {
    /// The region this rectangle describes.
    pub id: K,
    /// Minimum x.
    pub left: f64,
    /// Minimum y.
    pub top: f64,
    /// Maximum x.
    pub right: f64,
    /// Maximum y.
    pub bottom: f64,
    /// `right - left`.
    pub width: f64,
    /// `bottom - top`.
    pub height: f64,
    /// `(left + floor(width / 2), top + floor(height / 2))`.
    pub center: Point,
}

impl<K> NavRect<K> {
    /// Normalize `bounds` for `id`.
    ///
    /// Returns `None` when any coordinate, or the width or height, is not finite.
    pub fn new(id: K, bounds: Rect) -> Option<Self> {
        if !bounds.is_finite() {
            return None;
        }
        let r = bounds.abs();
        let width = r.width();
        let height = r.height();
        if !width.is_finite() || !height.is_finite() {
            return None;
        }
        let half = Point::new(width / 2.0, height / 2.0).floor();
        Some(Self {
            id,
            left: r.x0,
            top: r.y0,
            right: r.x1,
            bottom: r.y1,
            width,
            height,
            center: Point::new(r.x0 + half.x, r.y0 + half.y),
        })
    }

    /// The normalized bounds as a [`Rect`].
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// A zero-sized span at the center point.
    pub(crate) fn center_span(&self) -> Rect {
        Rect::from_points(self.center, self.center)
    }
}

/// Measure `id` against `geometry`.
///
/// Fails softly: a region without usable bounds yields `None`.
pub fn measure<K>(id: K, geometry: &impl Geometry<K>) -> Option<NavRect<K>>
where
    K: Copy,
{
    geometry.bounds(id).and_then(|b| NavRect::new(id, b))
}
