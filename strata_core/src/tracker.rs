// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracker: dirty-gated update loop and membership synchronization.
//!
//! A [`Tracker`] is an explicit context object owning the tracked node set,
//! the metric registry, the configuration, and the dirty flag. Multiple
//! independent trackers can coexist; nothing is process-global.
//!
//! # Frame loop pseudocode
//!
//! A typical backend wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_frame(tick: FrameTick) {
//!     // Scroll/resize handlers called tracker.mark_dirty() earlier;
//!     // mutation glue called the on_* membership methods.
//!     let outcome = tracker.on_tick(&tick, &geometry, &mut styles);
//!     // Tick source re-registers itself for the next frame.
//! }
//! ```
//!
//! # Update pass
//!
//! A dirty tick clears the flag and runs two strictly ordered phases:
//!
//! 1. **Geometry phase** — reads the viewport once and each tracked node's
//!    box from the [`GeometrySource`], storing a fresh [`Snapshot`] per node.
//!    Nodes with zero coverage now *and* on the previous pass are skipped:
//!    their stored snapshot is left untouched and phase 2 ignores them.
//! 2. **Metric phase** — for each non-skipped node, evaluates every registry
//!    entry against the fresh snapshot and writes
//!    `--<css_prefix><name>: <value>` through the [`StyleSink`], with the
//!    value formatted to the configured decimal accuracy.
//!
//! No geometry is read after the first style write, so hosts whose layout
//! engine flushes on interleaved read/write sequences see exactly one
//! read batch followed by one write batch per pass.

use alloc::format;
use alloc::vec::Vec;

use crate::backend::{GeometrySource, StyleSink};
use crate::config::TrackerConfig;
use crate::geometry::{self, Snapshot};
use crate::metrics::MetricRegistry;
use crate::node::{NodeKey, TrackedSet};
use crate::tick::{FrameTick, PassStats, TickOutcome};
use crate::trace::{PassEvent, TickEvent, Tracer};

/// Scroll-driven style variable tracker.
///
/// See the [module docs](self) for the update-pass contract.
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    registry: MetricRegistry,
    nodes: TrackedSet,
    dirty: bool,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl Tracker {
    /// Creates a tracker with the given configuration and the built-in
    /// metric registry.
    ///
    /// The tracker starts dirty, so the first tick always runs a full pass.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_registry(config, MetricRegistry::builtin())
    }

    /// Creates a tracker with an explicit metric registry.
    #[must_use]
    pub fn with_registry(config: TrackerConfig, registry: MetricRegistry) -> Self {
        Self {
            config,
            registry,
            nodes: TrackedSet::new(),
            dirty: true,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the tracked node set.
    #[must_use]
    pub fn nodes(&self) -> &TrackedSet {
        &self.nodes
    }

    /// Returns the metric registry.
    #[must_use]
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Returns the metric registry for in-place modification.
    pub fn registry_mut(&mut self) -> &mut MetricRegistry {
        &mut self.registry
    }

    /// Replaces the metric registry wholesale.
    pub fn set_registry(&mut self, registry: MetricRegistry) {
        self.registry = registry;
    }

    // -- Invalidation --

    /// Sets the dirty flag; the next tick will run a full update pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether an update pass is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Handles a document scroll event.
    pub fn on_scroll(&mut self) {
        self.mark_dirty();
    }

    /// Handles a viewport resize event.
    pub fn on_resize(&mut self) {
        self.mark_dirty();
    }

    // -- Membership synchronization --
    //
    // These methods are the host-neutral face of mutation observation.
    // Backends classify their native mutation records and answer the
    // marker-class queries; fakes drive the same methods in tests.

    /// Handles a structural mutation's added-nodes list.
    ///
    /// Each item pairs a node key with whether that node currently bears the
    /// marker class. Marker-bearing nodes not already tracked are added, in
    /// delivery order.
    pub fn on_nodes_added<I>(&mut self, added: I)
    where
        I: IntoIterator<Item = (NodeKey, bool)>,
    {
        for (key, bears_marker) in added {
            if bears_marker {
                self.nodes.track(key);
            }
        }
    }

    /// Handles a structural mutation's removed-nodes list.
    ///
    /// Every listed node that is tracked is untracked, marker class or not.
    pub fn on_nodes_removed<I>(&mut self, removed: I)
    where
        I: IntoIterator<Item = NodeKey>,
    {
        for key in removed {
            self.nodes.untrack(key);
        }
    }

    /// Handles a class-attribute mutation on one node.
    ///
    /// Tracks the node if it now bears the marker class and is untracked;
    /// untracks it if it no longer bears the marker class and is tracked.
    pub fn on_attribute_changed(&mut self, key: NodeKey, bears_marker: bool) {
        if bears_marker {
            self.nodes.track(key);
        } else {
            self.nodes.untrack(key);
        }
    }

    // -- Frame loop --

    /// Consumes one frame tick.
    ///
    /// If the dirty flag is clear this returns [`TickOutcome::Idle`] without
    /// touching `source` or `sink`. Otherwise the flag is cleared *first*
    /// (events arriving during the pass re-dirty for the next frame) and a
    /// full update pass runs.
    pub fn on_tick(
        &mut self,
        tick: &FrameTick,
        source: &impl GeometrySource,
        sink: &mut impl StyleSink,
    ) -> TickOutcome {
        self.on_tick_traced(tick, source, sink, &mut Tracer::none())
    }

    /// Like [`on_tick`](Self::on_tick), with frame-loop trace events.
    pub fn on_tick_traced(
        &mut self,
        tick: &FrameTick,
        source: &impl GeometrySource,
        sink: &mut impl StyleSink,
        tracer: &mut Tracer<'_>,
    ) -> TickOutcome {
        tracer.tick(&TickEvent::new(tick, self.dirty));
        if !self.dirty {
            return TickOutcome::Idle;
        }
        self.dirty = false;

        let stats = self.run_pass(source, sink);
        tracer.pass(&PassEvent {
            frame_index: tick.frame_index,
            tracked: self.nodes.len(),
            stats,
        });
        TickOutcome::Updated(stats)
    }

    /// Runs the two-phase update pass unconditionally.
    fn run_pass(&mut self, source: &impl GeometrySource, sink: &mut impl StyleSink) -> PassStats {
        let mut stats = PassStats::default();

        // Phase 1: geometry reads. `fresh[i]` records whether node `i`
        // received a new snapshot this pass.
        let viewport = source.viewport();
        let mut fresh = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.entries_mut() {
            let geometry = source.node_geometry(node.key);
            let (x_coverage, y_coverage) = geometry::coverage(&geometry, &viewport);
            if x_coverage + y_coverage == 0.0 && node.snapshot.is_off_screen() {
                fresh.push(false);
                stats.skipped += 1;
                continue;
            }
            node.snapshot = Snapshot::compute(&geometry, &viewport);
            fresh.push(true);
            stats.refreshed += 1;
        }

        // Phase 2: style writes, in set order then registry order.
        for (node, _) in self
            .nodes
            .entries()
            .iter()
            .zip(&fresh)
            .filter(|(_, fresh)| **fresh)
        {
            for (name, metric) in self.registry.iter() {
                let value = metric(&node.snapshot, node.key);
                let property = format!("--{}{}", self.config.css_prefix, name);
                let text = format!("{value:.precision$}", precision = self.config.decimal_accuracy);
                sink.set_custom_property(node.key, &property, &text);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect};

    use super::*;
    use crate::geometry::{NodeGeometry, Viewport};

    /// What a fake saw happen, for ordering assertions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Op {
        Read,
        Write,
    }

    struct FakeSource {
        viewport: Viewport,
        geometry: BTreeMap<u32, NodeGeometry>,
        log: Rc<RefCell<Vec<Op>>>,
    }

    impl FakeSource {
        fn new(viewport: Viewport, log: Rc<RefCell<Vec<Op>>>) -> Self {
            Self {
                viewport,
                geometry: BTreeMap::new(),
                log,
            }
        }

        fn place(&mut self, key: NodeKey, bounds: Rect) {
            self.geometry.insert(
                key.0,
                NodeGeometry {
                    bounds,
                    offset: Point::new(bounds.x0, bounds.y0),
                    size: bounds.size(),
                },
            );
        }
    }

    impl GeometrySource for FakeSource {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn node_geometry(&self, node: NodeKey) -> NodeGeometry {
            self.log.borrow_mut().push(Op::Read);
            self.geometry.get(&node.0).copied().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct FakeSink {
        writes: Vec<(NodeKey, String, String)>,
        log: Rc<RefCell<Vec<Op>>>,
    }

    impl StyleSink for FakeSink {
        fn set_custom_property(&mut self, node: NodeKey, name: &str, value: &str) {
            self.log.borrow_mut().push(Op::Write);
            self.writes.push((node, name.into(), value.into()));
        }
    }

    fn fixture() -> (Tracker, FakeSource, FakeSink) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let tracker = Tracker::default();
        let source = FakeSource::new(
            Viewport {
                width: 1000.0,
                height: 800.0,
                scroll_left: 0.0,
                scroll_top: 0.0,
            },
            Rc::clone(&log),
        );
        let sink = FakeSink {
            writes: Vec::new(),
            log,
        };
        (tracker, source, sink)
    }

    fn tick(index: u64) -> FrameTick {
        FrameTick {
            now_ms: index as f64 * 16.7,
            frame_index: index,
        }
    }

    #[test]
    fn clean_tick_does_nothing() {
        let (mut tracker, source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);

        // First tick consumes the initial dirtiness.
        assert!(tracker.on_tick(&tick(0), &source, &mut sink).updated());
        sink.log.borrow_mut().clear();

        let outcome = tracker.on_tick(&tick(1), &source, &mut sink);
        assert_eq!(outcome, TickOutcome::Idle);
        assert!(sink.log.borrow().is_empty(), "no reads or writes when clean");
    }

    #[test]
    fn dirty_flag_triggers_exactly_one_pass() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 200.0, 200.0));
        let _ = tracker.on_tick(&tick(0), &source, &mut sink);

        tracker.on_scroll();
        assert!(tracker.on_tick(&tick(1), &source, &mut sink).updated());
        assert!(!tracker.is_dirty(), "flag cleared by the pass");
        assert_eq!(
            tracker.on_tick(&tick(2), &source, &mut sink),
            TickOutcome::Idle,
            "no further passes until dirtied again"
        );
    }

    #[test]
    fn all_reads_precede_all_writes() {
        let (mut tracker, mut source, mut sink) = fixture();
        for i in 0..3 {
            tracker.on_attribute_changed(NodeKey(i), true);
            source.place(NodeKey(i), Rect::new(0.0, i as f64 * 100.0, 200.0, 900.0));
        }

        assert!(tracker.on_tick(&tick(0), &source, &mut sink).updated());
        let log = sink.log.borrow();
        let first_write = log.iter().position(|op| *op == Op::Write);
        let last_read = log.iter().rposition(|op| *op == Op::Read);
        assert!(
            last_read < first_write,
            "geometry phase finished before the first style write: {log:?}"
        );
    }

    #[test]
    fn off_screen_nodes_are_skipped_after_first_pass() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);
        // Fully outside the viewport on both axes.
        source.place(NodeKey(1), Rect::new(-500.0, -500.0, -300.0, -300.0));

        let outcome = tracker.on_tick(&tick(0), &source, &mut sink);
        assert_eq!(
            outcome,
            TickOutcome::Updated(PassStats {
                refreshed: 0,
                skipped: 1
            }),
            "invisible node with zeroed prior snapshot is skipped"
        );
        assert!(sink.writes.is_empty(), "skipped node receives no writes");

        // A second dirty pass with the node still invisible writes nothing,
        // so all previously written properties stay byte-identical.
        tracker.mark_dirty();
        let _ = tracker.on_tick(&tick(1), &source, &mut sink);
        assert!(sink.writes.is_empty(), "skip rule holds across passes");
    }

    #[test]
    fn node_leaving_the_viewport_gets_one_final_refresh() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 200.0, 200.0));
        let _ = tracker.on_tick(&tick(0), &source, &mut sink);
        assert!(!sink.writes.is_empty(), "visible node gets writes");

        // Move it off-screen: old snapshot has coverage, so one more refresh
        // happens (writing zero coverage), then it goes inert.
        source.place(NodeKey(1), Rect::new(-900.0, -900.0, -700.0, -700.0));
        sink.writes.clear();
        tracker.mark_dirty();
        let outcome = tracker.on_tick(&tick(1), &source, &mut sink);
        assert_eq!(
            outcome,
            TickOutcome::Updated(PassStats {
                refreshed: 1,
                skipped: 0
            })
        );
        assert!(!sink.writes.is_empty(), "transition to invisible is written");

        sink.writes.clear();
        tracker.mark_dirty();
        let outcome = tracker.on_tick(&tick(2), &source, &mut sink);
        assert_eq!(
            outcome,
            TickOutcome::Updated(PassStats {
                refreshed: 0,
                skipped: 1
            })
        );
        assert!(sink.writes.is_empty(), "inert once invisible twice");
    }

    #[test]
    fn writes_use_prefix_and_fixed_precision() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 250.0, 200.0));

        let _ = tracker.on_tick(&tick(0), &source, &mut sink);
        let coverage_x = sink
            .writes
            .iter()
            .find(|(_, name, _)| name == "--parallax-coverage-x")
            .expect("coverage-x written");
        assert_eq!(coverage_x.2, "0.250", "three decimal digits by default");

        let names: Vec<_> = sink.writes.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(
            names[0], "--parallax-scroll-x",
            "writes follow registry order"
        );
    }

    #[test]
    fn custom_precision_and_prefix() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tracker = Tracker::new(TrackerConfig {
            css_prefix: "fx-".into(),
            decimal_accuracy: 1,
            ..TrackerConfig::default()
        });
        let mut source = FakeSource::new(
            Viewport {
                width: 1000.0,
                height: 800.0,
                scroll_left: 0.0,
                scroll_top: 0.0,
            },
            Rc::clone(&log),
        );
        let mut sink = FakeSink {
            writes: Vec::new(),
            log,
        };

        tracker.on_attribute_changed(NodeKey(1), true);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 250.0, 200.0));
        let _ = tracker.on_tick(&tick(0), &source, &mut sink);

        let coverage_x = sink
            .writes
            .iter()
            .find(|(_, name, _)| name == "--fx-coverage-x")
            .expect("prefixed name");
        assert_eq!(coverage_x.2, "0.2", "one decimal digit");
    }

    #[test]
    fn removed_nodes_stop_receiving_writes() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_nodes_added([(NodeKey(1), true), (NodeKey(2), true)]);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 200.0, 200.0));
        source.place(NodeKey(2), Rect::new(300.0, 0.0, 500.0, 200.0));
        let _ = tracker.on_tick(&tick(0), &source, &mut sink);

        tracker.on_nodes_removed([NodeKey(1)]);
        sink.writes.clear();
        tracker.mark_dirty();
        let _ = tracker.on_tick(&tick(1), &source, &mut sink);
        assert!(
            sink.writes.iter().all(|(key, _, _)| *key == NodeKey(2)),
            "only the surviving node is written"
        );
    }

    #[test]
    fn added_nodes_receive_writes_starting_next_pass() {
        let (mut tracker, mut source, mut sink) = fixture();
        let _ = tracker.on_tick(&tick(0), &source, &mut sink);

        // Unmarked nodes are ignored; marked ones join the set.
        tracker.on_nodes_added([(NodeKey(5), false), (NodeKey(6), true)]);
        assert!(!tracker.nodes().contains(NodeKey(5)));
        assert!(tracker.nodes().contains(NodeKey(6)));

        source.place(NodeKey(6), Rect::new(0.0, 0.0, 100.0, 100.0));
        tracker.mark_dirty();
        let _ = tracker.on_tick(&tick(1), &source, &mut sink);
        assert!(
            sink.writes.iter().any(|(key, _, _)| *key == NodeKey(6)),
            "newly tracked node is written on the next pass"
        );
    }

    #[test]
    fn class_removal_untracks() {
        let (mut tracker, _source, _sink) = fixture();
        tracker.on_attribute_changed(NodeKey(3), true);
        assert!(tracker.nodes().contains(NodeKey(3)));
        tracker.on_attribute_changed(NodeKey(3), false);
        assert!(!tracker.nodes().contains(NodeKey(3)));
    }

    #[test]
    fn replacing_the_registry_changes_written_properties() {
        let (mut tracker, mut source, mut sink) = fixture();
        tracker.on_attribute_changed(NodeKey(1), true);
        source.place(NodeKey(1), Rect::new(0.0, 0.0, 200.0, 200.0));

        let mut registry = MetricRegistry::empty();
        registry.insert("lone", |snap, _| snap.x_coverage);
        tracker.set_registry(registry);

        let _ = tracker.on_tick(&tick(0), &source, &mut sink);
        assert_eq!(sink.writes.len(), 1, "one metric, one write");
        assert_eq!(sink.writes[0].1, "--parallax-lone");
    }
}
