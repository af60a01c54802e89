// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! Strata splits host-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Tick source** — Invokes [`Tracker::on_tick`] once per animation frame
//!   via a platform mechanism (e.g. `requestAnimationFrame`). This is
//!   backend-specific and not abstracted by a trait because the setup and
//!   lifecycle differ fundamentally across hosts; tests drive ticks
//!   synchronously instead.
//!
//! - **Geometry source** — Implements [`GeometrySource`] to answer viewport
//!   and per-node box queries against the live document.
//!
//! - **Style sink** — Implements [`StyleSink`] to write named custom style
//!   properties onto nodes.
//!
//! - **Membership glue** — Observes structural and class-attribute mutations
//!   (e.g. via `MutationObserver`) and forwards them to the tracker's
//!   [`on_nodes_added`], [`on_nodes_removed`], and [`on_attribute_changed`]
//!   methods, answering marker-class queries along the way.
//!
//! - **Invalidation glue** — Forwards scroll and resize events to
//!   [`Tracker::mark_dirty`].
//!
//! # Read/write ordering
//!
//! The update pass performs **all** [`GeometrySource`] reads across all
//! tracked nodes before the first [`StyleSink`] write. Backends can rely on
//! this to avoid interleaved layout reads and style mutations (forced
//! synchronous layout); they must not read geometry lazily from inside
//! [`StyleSink::set_custom_property`].
//!
//! [`Tracker::on_tick`]: crate::tracker::Tracker::on_tick
//! [`Tracker::mark_dirty`]: crate::tracker::Tracker::mark_dirty
//! [`on_nodes_added`]: crate::tracker::Tracker::on_nodes_added
//! [`on_nodes_removed`]: crate::tracker::Tracker::on_nodes_removed
//! [`on_attribute_changed`]: crate::tracker::Tracker::on_attribute_changed

use crate::geometry::{NodeGeometry, Viewport};
use crate::node::NodeKey;

/// Answers geometry queries against the live host document.
///
/// Both the DOM-backed source and test fakes implement this trait, enabling
/// generic update passes and deterministic unit tests.
pub trait GeometrySource {
    /// Returns the current viewport extent and scroll offsets.
    fn viewport(&self) -> Viewport;

    /// Returns the current box geometry of `node`.
    ///
    /// Values for detached or unknown nodes are not validated; backends may
    /// return zeroed geometry, which the zero-coverage skip rule treats as
    /// off-screen.
    fn node_geometry(&self, node: NodeKey) -> NodeGeometry;
}

/// Receives formatted custom-property writes for tracked nodes.
///
/// `name` is the full property name including the leading `--` and the
/// configured prefix (e.g. `--parallax-scroll-y`); `value` is a fixed-point
/// decimal string.
pub trait StyleSink {
    /// Writes one custom style property on `node`.
    fn set_custom_property(&mut self, node: NodeKey, name: &str, value: &str);
}
