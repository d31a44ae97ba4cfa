// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance metrics used to order candidates within a tier.
//!
//! Every metric is a scalar where lower is preferred. The four `near_*` metrics measure a gap
//! and are clamped at zero, so a candidate that spans the reference line scores exactly `0`.
//! The four edge metrics return a raw (possibly negated) edge coordinate.

use kurbo::Point;

use crate::rect::NavRect;

/// Names one of the eight metrics in [`Distances`].
///
/// Tiers carry an ordered list of these as their tie-breakers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Horizontal gap to the vertical line through the target's center.
    NearPlumbLine,
    /// Vertical gap to the horizontal line through the target's center.
    NearHorizon,
    /// Horizontal gap to the target's left edge.
    NearTargetLeft,
    /// Vertical gap to the target's top edge.
    NearTargetTop,
    /// Top edge; higher candidates first.
    Top,
    /// Negated bottom edge; lower candidates first.
    Bottom,
    /// Left edge; candidates further left first.
    Left,
    /// Negated right edge; candidates further right first.
    Right,
}

/// Metric evaluator bound to a fixed target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Distances {
    left: f64,
    top: f64,
    center: Point,
}

impl Distances {
    /// Build the evaluator for `target`.
    pub fn new<K>(target: &NavRect<K>) -> Self {
        Self {
            left: target.left,
            top: target.top,
            center: target.center,
        }
    }

    /// Evaluate `metric` for `rect`.
    pub fn eval<K>(&self, metric: Metric, rect: &NavRect<K>) -> f64 {
        match metric {
            Metric::NearPlumbLine => self.near_plumb_line(rect),
            Metric::NearHorizon => self.near_horizon(rect),
            Metric::NearTargetLeft => self.near_target_left(rect),
            Metric::NearTargetTop => self.near_target_top(rect),
            Metric::Top => Self::top(rect),
            Metric::Bottom => Self::bottom(rect),
            Metric::Left => Self::left(rect),
            Metric::Right => Self::right(rect),
        }
    }

    /// See [`Metric::NearPlumbLine`].
    pub fn near_plumb_line<K>(&self, rect: &NavRect<K>) -> f64 {
        let d = if rect.center.x < self.center.x {
            self.center.x - rect.right
        } else {
            rect.left - self.center.x
        };
        d.max(0.0)
    }

    /// See [`Metric::NearHorizon`].
    pub fn near_horizon<K>(&self, rect: &NavRect<K>) -> f64 {
        let d = if rect.center.y < self.center.y {
            self.center.y - rect.bottom
        } else {
            rect.top - self.center.y
        };
        d.max(0.0)
    }

    /// See [`Metric::NearTargetLeft`].
    pub fn near_target_left<K>(&self, rect: &NavRect<K>) -> f64 {
        let d = if rect.center.x < self.center.x {
            self.left - rect.right
        } else {
            rect.left - self.left
        };
        d.max(0.0)
    }

    /// See [`Metric::NearTargetTop`].
    pub fn near_target_top<K>(&self, rect: &NavRect<K>) -> f64 {
        let d = if rect.center.y < self.center.y {
            self.top - rect.bottom
        } else {
            rect.top - self.top
        };
        d.max(0.0)
    }

    /// See [`Metric::Top`].
    pub fn top<K>(rect: &NavRect<K>) -> f64 {
        rect.top
    }

    /// See [`Metric::Bottom`].
    pub fn bottom<K>(rect: &NavRect<K>) -> f64 {
        -rect.bottom
    }

    /// See [`Metric::Left`].
    pub fn left<K>(rect: &NavRect<K>) -> f64 {
        rect.left
    }

    /// See [`Metric::Right`].
    pub fn right<K>(rect: &NavRect<K>) -> f64 {
        -rect.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn r(x0: f64, y0: f64, x1: f64, y1: f64) -> NavRect<u8> {
        NavRect::new(0, Rect::new(x0, y0, x1, y1)).unwrap()
    }

    #[test]
    fn near_metrics_measure_gaps() {
        let target = r(100.0, 100.0, 200.0, 200.0);
        let d = Distances::new(&target);

        // Fully left of the plumb line at x = 150.
        assert_eq!(d.near_plumb_line(&r(0.0, 0.0, 40.0, 40.0)), 110.0);
        // Right of it.
        assert_eq!(d.near_plumb_line(&r(170.0, 0.0, 180.0, 10.0)), 20.0);
        // Above the horizon at y = 150.
        assert_eq!(d.near_horizon(&r(0.0, 0.0, 10.0, 90.0)), 60.0);
        // Edge variants measure to the target's left/top edges.
        assert_eq!(d.near_target_left(&r(0.0, 0.0, 40.0, 40.0)), 60.0);
        assert_eq!(d.near_target_left(&r(160.0, 0.0, 170.0, 10.0)), 60.0);
        assert_eq!(d.near_target_top(&r(0.0, 0.0, 10.0, 90.0)), 10.0);
    }

    #[test]
    fn near_metrics_are_zero_when_spanning() {
        let target = r(100.0, 100.0, 200.0, 200.0);
        let d = Distances::new(&target);
        let wide = r(0.0, 0.0, 400.0, 400.0);
        assert_eq!(d.near_plumb_line(&wide), 0.0);
        assert_eq!(d.near_horizon(&wide), 0.0);
        assert_eq!(d.near_target_left(&wide), 0.0);
        assert_eq!(d.near_target_top(&wide), 0.0);
    }

    #[test]
    fn edge_metrics_are_raw_or_negated() {
        let d = Distances::new(&r(0.0, 0.0, 1.0, 1.0));
        let c = r(10.0, 20.0, 30.0, 40.0);
        assert_eq!(d.eval(Metric::Top, &c), 20.0);
        assert_eq!(d.eval(Metric::Bottom, &c), -40.0);
        assert_eq!(d.eval(Metric::Left, &c), 10.0);
        assert_eq!(d.eval(Metric::Right, &c), -30.0);
    }
}
