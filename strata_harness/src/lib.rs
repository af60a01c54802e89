// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fakes and a synchronous tick driver for testing strata trackers.
//!
//! Real trackers are driven by a live rendering host: an animation-frame
//! loop, a mutating document, and a layout engine answering geometry
//! queries. This crate replaces all three with deterministic fakes so tests
//! can drive N synchronous ticks and assert on every written property:
//!
//! - [`FakeDom`] — a [`GeometrySource`] over document-space rectangles with
//!   settable viewport and scroll offsets.
//! - [`RecordingSink`] — a [`StyleSink`] that logs every write and keeps the
//!   current value of each property.
//! - [`TickDriver`] — produces consecutive [`FrameTick`]s at a nominal
//!   16.7 ms cadence.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use strata_core::backend::{GeometrySource, StyleSink};
use strata_core::geometry::{NodeGeometry, Viewport};
use strata_core::node::NodeKey;
use strata_core::tick::{FrameTick, TickOutcome};
use strata_core::tracker::Tracker;

/// A fake document: viewport, scroll offsets, and document-space node boxes.
///
/// Node rectangles are given in document coordinates; the geometry source
/// translates them by the current scroll offsets to produce the
/// viewport-relative bounds a real host would report.
#[derive(Clone, Debug)]
pub struct FakeDom {
    viewport_width: f64,
    viewport_height: f64,
    scroll_left: f64,
    scroll_top: f64,
    nodes: BTreeMap<u32, Rect>,
}

impl FakeDom {
    /// Creates a document with the given viewport extent, scrolled to the
    /// origin, with no nodes.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            scroll_left: 0.0,
            scroll_top: 0.0,
            nodes: BTreeMap::new(),
        }
    }

    /// Places (or moves) a node at the given document-space rectangle.
    pub fn place(&mut self, key: NodeKey, rect: Rect) {
        self.nodes.insert(key.0, rect);
    }

    /// Removes a node. Subsequent geometry queries for it return zeroed
    /// boxes, as for any unknown node.
    pub fn remove(&mut self, key: NodeKey) {
        self.nodes.remove(&key.0);
    }

    /// Sets the document scroll offsets.
    ///
    /// This only moves the fake document; pair it with
    /// [`Tracker::on_scroll`] to simulate the host scroll event.
    pub fn scroll_to(&mut self, left: f64, top: f64) {
        self.scroll_left = left;
        self.scroll_top = top;
    }

    /// Resizes the viewport, keeping scroll offsets.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }
}

impl GeometrySource for FakeDom {
    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
        }
    }

    fn node_geometry(&self, node: NodeKey) -> NodeGeometry {
        let Some(doc_rect) = self.nodes.get(&node.0) else {
            return NodeGeometry::default();
        };
        NodeGeometry {
            bounds: Rect::new(
                doc_rect.x0 - self.scroll_left,
                doc_rect.y0 - self.scroll_top,
                doc_rect.x1 - self.scroll_left,
                doc_rect.y1 - self.scroll_top,
            ),
            offset: Point::new(doc_rect.x0, doc_rect.y0),
            size: doc_rect.size(),
        }
    }
}

/// One recorded style write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleWrite {
    /// The node the property was written on.
    pub node: NodeKey,
    /// Full property name, including the `--` prefix.
    pub name: String,
    /// Formatted value string.
    pub value: String,
}

/// A [`StyleSink`] that records every write and the resulting property map.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    log: Vec<StyleWrite>,
    current: BTreeMap<(u32, String), String>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the write log since the last [`clear_log`](Self::clear_log).
    #[must_use]
    pub fn log(&self) -> &[StyleWrite] {
        &self.log
    }

    /// Clears the write log, keeping current property values.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Returns the current value of a property on a node, if ever written.
    #[must_use]
    pub fn property(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.current
            .get(&(node.0, String::from(name)))
            .map(String::as_str)
    }

    /// Returns the full current property map of a node, name → value.
    #[must_use]
    pub fn properties_of(&self, node: NodeKey) -> BTreeMap<String, String> {
        self.current
            .iter()
            .filter(|((key, _), _)| *key == node.0)
            .map(|((_, name), value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Returns whether any write in the log targeted `node`.
    #[must_use]
    pub fn wrote_to(&self, node: NodeKey) -> bool {
        self.log.iter().any(|write| write.node == node)
    }
}

impl StyleSink for RecordingSink {
    fn set_custom_property(&mut self, node: NodeKey, name: &str, value: &str) {
        self.log.push(StyleWrite {
            node,
            name: String::from(name),
            value: String::from(value),
        });
        self.current
            .insert((node.0, String::from(name)), String::from(value));
    }
}

/// Produces consecutive frame ticks at a nominal 60 Hz cadence.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickDriver {
    next_frame: u64,
}

impl TickDriver {
    /// Creates a driver starting at frame 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one tick to the tracker.
    pub fn tick(
        &mut self,
        tracker: &mut Tracker,
        dom: &FakeDom,
        sink: &mut RecordingSink,
    ) -> TickOutcome {
        let frame_index = self.next_frame;
        self.next_frame += 1;
        let tick = FrameTick {
            now_ms: frame_index as f64 * 16.7,
            frame_index,
        };
        tracker.on_tick(&tick, dom, sink)
    }

    /// Delivers `frames` consecutive ticks, returning each outcome.
    pub fn run(
        &mut self,
        tracker: &mut Tracker,
        dom: &FakeDom,
        sink: &mut RecordingSink,
        frames: u64,
    ) -> Vec<TickOutcome> {
        (0..frames).map(|_| self.tick(tracker, dom, sink)).collect()
    }
}
