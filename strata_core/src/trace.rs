// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tracker calls at each stage of a tick. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.

use crate::tick::{FrameTick, PassStats};

/// Emitted for every consumed frame tick, before the dirty gate is checked.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Frame counter carried from the [`FrameTick`].
    pub frame_index: u64,
    /// Host timestamp of the tick, in milliseconds.
    pub now_ms: f64,
    /// Whether the dirty flag was set when the tick arrived.
    pub dirty: bool,
}

impl TickEvent {
    /// Creates a `TickEvent` from a tick plus the tracker's dirty state.
    #[must_use]
    pub fn new(tick: &FrameTick, dirty: bool) -> Self {
        Self {
            frame_index: tick.frame_index,
            now_ms: tick.now_ms,
            dirty,
        }
    }
}

/// Emitted after an update pass completes.
#[derive(Clone, Copy, Debug)]
pub struct PassEvent {
    /// Frame counter of the tick that ran the pass.
    pub frame_index: u64,
    /// Number of tracked nodes at pass time.
    pub tracked: usize,
    /// Nodes refreshed and skipped by this pass.
    pub stats: PassStats,
}

/// Receives frame-loop trace events.
pub trait TraceSink {
    /// Called once per consumed tick.
    fn on_tick(&mut self, event: &TickEvent) {
        _ = event;
    }

    /// Called after each completed update pass (dirty ticks only).
    fn on_pass(&mut self, event: &PassEvent) {
        _ = event;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, event: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick(event);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = event;
        }
    }

    /// Emits a [`PassEvent`].
    #[inline]
    pub fn pass(&mut self, event: &PassEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass(event);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = event;
        }
    }
}
