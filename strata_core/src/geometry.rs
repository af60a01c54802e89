// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport geometry and per-node scroll snapshots.
//!
//! The update pass reduces each tracked node's box geometry to four scalars:
//!
//! - **Coverage** — the fraction of the viewport's width/height that the
//!   node's bounding box currently overlaps, in `[0, 1]`.
//! - **Scroll progress** — the fraction of the node's scrollable span
//!   (relative to the viewport) that has been scrolled past, in `[0, 1]`.
//!
//! Both are captured in a [`Snapshot`], which is stored per tracked node and
//! overwritten in place on each pass. The previous snapshot feeds the skip
//! rule: a node whose coverage is zero on two consecutive passes is inert and
//! its derived metrics are not re-applied.
//!
//! # Degenerate inputs
//!
//! Inputs are not validated. A zero-sized viewport or a node whose layout
//! width equals the viewport width produces division by zero, and the
//! resulting `NaN`/`Infinity` flows through `f64::clamp` unchanged (`clamp`
//! propagates `NaN`; infinities clamp to the bounds). This matches the
//! unguarded arithmetic of the behavior being modeled and is deliberate.

use kurbo::{Point, Rect, Size};

/// The scrollable viewport: client extent plus document scroll offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Client width of the viewport, in CSS pixels.
    pub width: f64,
    /// Client height of the viewport, in CSS pixels.
    pub height: f64,
    /// Horizontal document scroll offset.
    pub scroll_left: f64,
    /// Vertical document scroll offset.
    pub scroll_top: f64,
}

/// Box geometry for one tracked node, as read from the host document.
///
/// `bounds` is viewport-relative (the host's bounding client rect); `offset`
/// and `size` are document-relative layout values (the host's offset
/// left/top/width/height).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeGeometry {
    /// Viewport-relative bounding box.
    pub bounds: Rect,
    /// Document-relative layout position.
    pub offset: Point,
    /// Layout extent.
    pub size: Size,
}

/// The geometry-derived scalars for one node, recomputed each dirty pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Horizontal scroll progress in `[0, 1]`.
    pub x_scroll_progress: f64,
    /// Vertical scroll progress in `[0, 1]`.
    pub y_scroll_progress: f64,
    /// Fraction of the viewport width the node spans, in `[0, 1]`.
    pub x_coverage: f64,
    /// Fraction of the viewport height the node spans, in `[0, 1]`.
    pub y_coverage: f64,
}

impl Snapshot {
    /// A snapshot with all four scalars at zero.
    ///
    /// Freshly tracked nodes start here, so a node that has never been
    /// visible is inert from its very first pass.
    pub const ZERO: Self = Self {
        x_scroll_progress: 0.0,
        y_scroll_progress: 0.0,
        x_coverage: 0.0,
        y_coverage: 0.0,
    };

    /// Returns whether this snapshot records zero coverage on both axes.
    ///
    /// Uses the exact `x + y == 0` comparison of the skip rule, so a `NaN`
    /// coverage never counts as off-screen.
    #[inline]
    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.x_coverage + self.y_coverage == 0.0
    }

    /// Computes a full snapshot for a node from its geometry and the viewport.
    #[must_use]
    pub fn compute(geometry: &NodeGeometry, viewport: &Viewport) -> Self {
        let (x_coverage, y_coverage) = coverage(geometry, viewport);
        Self {
            x_scroll_progress: axis_progress(
                viewport.scroll_left,
                geometry.offset.x,
                geometry.size.width,
                viewport.width,
            ),
            y_scroll_progress: axis_progress(
                viewport.scroll_top,
                geometry.offset.y,
                geometry.size.height,
                viewport.height,
            ),
            x_coverage,
            y_coverage,
        }
    }
}

/// Computes `(x_coverage, y_coverage)` for a node against the viewport.
///
/// Each axis is the overlap length between the node's extent and the
/// viewport's extent, clamped to `[0, extent]` and normalized by the extent.
#[must_use]
pub fn coverage(geometry: &NodeGeometry, viewport: &Viewport) -> (f64, f64) {
    (
        axis_coverage(geometry.bounds.x0, geometry.bounds.x1, viewport.width),
        axis_coverage(geometry.bounds.y0, geometry.bounds.y1, viewport.height),
    )
}

/// Overlap between `[start, end]` and `[0, extent]`, normalized to `[0, 1]`.
fn axis_coverage(start: f64, end: f64, extent: f64) -> f64 {
    (end.min(extent) - start.max(0.0)).clamp(0.0, extent) / extent
}

/// Scroll progress along one axis.
///
/// The node's scrollable span starts at `offset - extent` (the scroll
/// position where its leading edge enters the viewport) and ends at `length`
/// (its layout extent). Division by zero when `length` equals the span start
/// is left unguarded; see the module docs.
fn axis_progress(scroll: f64, offset: f64, length: f64, extent: f64) -> f64 {
    let span_start = offset - extent;
    ((scroll - span_start) / (length - span_start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: f64, height: f64, scroll_left: f64, scroll_top: f64) -> Viewport {
        Viewport {
            width,
            height,
            scroll_left,
            scroll_top,
        }
    }

    fn node(bounds: Rect, offset: Point, size: Size) -> NodeGeometry {
        NodeGeometry {
            bounds,
            offset,
            size,
        }
    }

    #[test]
    fn fully_visible_node_has_full_coverage() {
        let vp = viewport(1000.0, 800.0, 0.0, 0.0);
        let geo = node(
            Rect::new(100.0, 100.0, 300.0, 300.0),
            Point::new(100.0, 100.0),
            Size::new(200.0, 200.0),
        );
        let (cx, cy) = coverage(&geo, &vp);
        assert!((cx - 0.2).abs() < 1e-12, "node spans 200 of 1000: {cx}");
        assert!((cy - 0.25).abs() < 1e-12, "node spans 200 of 800: {cy}");
    }

    #[test]
    fn off_screen_horizontally_partially_visible_vertically() {
        // Right edge left of the viewport, vertical extent half inside.
        let vp = viewport(1000.0, 800.0, 0.0, 0.0);
        let geo = node(
            Rect::new(-300.0, -100.0, -100.0, 100.0),
            Point::new(0.0, 0.0),
            Size::new(200.0, 200.0),
        );
        let (cx, cy) = coverage(&geo, &vp);
        assert_eq!(cx, 0.0, "fully outside horizontally");
        assert!(cy > 0.0 && cy < 1.0, "partially inside vertically: {cy}");
    }

    #[test]
    fn coverage_is_clamped_to_unit_interval() {
        // Node much larger than the viewport on both axes.
        let vp = viewport(1000.0, 800.0, 0.0, 0.0);
        let geo = node(
            Rect::new(-5000.0, -5000.0, 5000.0, 5000.0),
            Point::new(0.0, 0.0),
            Size::new(10_000.0, 10_000.0),
        );
        let (cx, cy) = coverage(&geo, &vp);
        assert_eq!(cx, 1.0, "oversized node covers the full width");
        assert_eq!(cy, 1.0, "oversized node covers the full height");
    }

    #[test]
    fn progress_is_zero_before_span_and_one_after() {
        // Node at x = 1200 with width 400 against a 1000-wide viewport: its
        // span runs from scroll 200 (leading edge enters) to scroll 400.
        let geo = node(
            Rect::new(1200.0, 0.0, 1600.0, 200.0),
            Point::new(1200.0, 0.0),
            Size::new(400.0, 200.0),
        );
        let before = viewport(1000.0, 800.0, 100.0, 0.0);
        let snap = Snapshot::compute(&geo, &before);
        assert_eq!(snap.x_scroll_progress, 0.0, "not yet scrolled into span");

        let after = viewport(1000.0, 800.0, 1000.0, 0.0);
        let snap = Snapshot::compute(&geo, &after);
        assert_eq!(snap.x_scroll_progress, 1.0, "scrolled far past the span");
    }

    #[test]
    fn progress_is_monotone_across_the_span() {
        // Span runs over scroll_top in [200, 400] for this node.
        let vp0 = viewport(1000.0, 800.0, 0.0, 250.0);
        let vp1 = viewport(1000.0, 800.0, 0.0, 350.0);
        let geo = node(
            Rect::new(0.0, 750.0, 400.0, 1150.0),
            Point::new(0.0, 1000.0),
            Size::new(400.0, 400.0),
        );
        let a = Snapshot::compute(&geo, &vp0).y_scroll_progress;
        let b = Snapshot::compute(&geo, &vp1).y_scroll_progress;
        assert!(a < b, "more scroll means more progress: {a} vs {b}");
        assert!((0.0..=1.0).contains(&a), "progress in unit interval: {a}");
        assert!((0.0..=1.0).contains(&b), "progress in unit interval: {b}");
    }

    #[test]
    fn zero_denominator_yields_nan_progress() {
        // length == offset - extent makes the progress denominator zero and
        // the numerator zero at the matching scroll offset.
        let vp = viewport(1000.0, 800.0, 1200.0, 0.0);
        let geo = node(
            Rect::new(0.0, 0.0, 1200.0, 100.0),
            Point::new(2200.0, 0.0),
            Size::new(1200.0, 100.0),
        );
        // span_start = 2200 - 1000 = 1200 == size.width.
        let snap = Snapshot::compute(&geo, &vp);
        assert!(
            snap.x_scroll_progress.is_nan(),
            "0/0 is preserved as NaN, not special-cased"
        );
    }

    #[test]
    fn off_screen_snapshot_reports_off_screen() {
        assert!(Snapshot::ZERO.is_off_screen(), "zero snapshot is off-screen");
        let visible = Snapshot {
            x_coverage: 0.3,
            ..Snapshot::ZERO
        };
        assert!(!visible.is_off_screen(), "nonzero coverage is on-screen");
    }
}
