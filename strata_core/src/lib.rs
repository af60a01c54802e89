// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core engine for scroll-driven style variables.
//!
//! `strata_core` computes scroll progress and viewport coverage for a set of
//! marked document nodes and exposes them as style-bindable numeric
//! variables, recomputed at most once per animation frame. It is `no_std`
//! compatible (with `alloc`) and host-neutral: all document access goes
//! through backend traits.
//!
//! # Architecture
//!
//! The crate is organized around a dirty-gated frame loop that turns host
//! events into batched style writes:
//!
//! ```text
//!   scroll / resize ──► Tracker::mark_dirty()
//!   DOM mutations ────► Tracker::{on_nodes_added, on_nodes_removed,
//!                                 on_attribute_changed}
//!
//!   Backend (tick source)
//!       │
//!       ▼
//!   FrameTick ──► Tracker::on_tick()
//!                     │  (dirty? clear flag, else return Idle)
//!                     ▼
//!          GeometrySource reads ──► Snapshot per node
//!                     │  (skip rule: twice-invisible nodes are inert)
//!                     ▼
//!          MetricRegistry eval ──► StyleSink writes (--prefix-name: value)
//! ```
//!
//! **[`tracker`]** — The [`Tracker`](tracker::Tracker) context object: dirty
//! flag, tracked set, registry, and the two-phase update pass. All geometry
//! reads complete before the first style write.
//!
//! **[`geometry`]** — Viewport/node box types (via `kurbo`) and the
//! coverage and scroll-progress math.
//!
//! **[`metrics`]** — Ordered metric registry with the built-in entries
//! (`scroll-x`, `coverage-y`, `visible`, `cubic-x`, …) and
//! insert/remove/merge operations.
//!
//! **[`node`]** — [`NodeKey`](node::NodeKey) handles (assigned by backends)
//! and the ordered [`TrackedSet`](node::TrackedSet).
//!
//! **[`backend`]** — The [`GeometrySource`](backend::GeometrySource) and
//! [`StyleSink`](backend::StyleSink) traits that host backends implement.
//!
//! **[`config`]** — [`TrackerConfig`](config::TrackerConfig): marker class,
//! custom-property prefix, decimal accuracy.
//!
//! **[`tick`]** — [`FrameTick`](tick::FrameTick) input and
//! [`TickOutcome`](tick::TickOutcome)/[`PassStats`](tick::PassStats) output.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod geometry;
pub mod metrics;
pub mod node;
pub mod tick;
pub mod trace;
pub mod tracker;
