// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks and per-tick outcomes.
//!
//! A [`FrameTick`] is one frame opportunity delivered by the backend's tick
//! source (e.g. a `requestAnimationFrame` callback). The tracker consumes one
//! tick per frame and reports a [`TickOutcome`]: either the dirty flag was
//! clear and nothing happened (the common case), or a full update pass ran
//! and [`PassStats`] describe it.

/// A frame opportunity delivered by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTick {
    /// Host timestamp of the tick, in milliseconds. On the web this is the
    /// `DOMHighResTimeStamp` handed to the animation-frame callback.
    pub now_ms: f64,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
}

/// Statistics for one completed update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Nodes whose snapshot was recomputed and whose metrics were written.
    pub refreshed: usize,
    /// Nodes skipped by the zero-coverage rule (no reads stored, no writes).
    pub skipped: usize,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The dirty flag was clear: no geometry was read, no style was written.
    Idle,
    /// The dirty flag was set: it was cleared and a full pass ran.
    Updated(PassStats),
}

impl TickOutcome {
    /// Returns whether this tick ran an update pass.
    #[must_use]
    pub fn updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}
