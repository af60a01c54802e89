// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The derived metric registry.
//!
//! A *metric* is a pure function from a node's geometry [`Snapshot`] (plus
//! the node's [`NodeKey`], for host-specific metrics) to a number. During the
//! metric application pass, every registry entry is evaluated against every
//! freshly snapshotted node and the result is written as a custom style
//! property named `--<css_prefix><metric name>`.
//!
//! The registry is an explicit ordered mapping: entries iterate in insertion
//! order, so style writes are deterministic for a given registry history.
//! Besides wholesale replacement, individual entries can be
//! [inserted](MetricRegistry::insert), [removed](MetricRegistry::remove), or
//! [merged](MetricRegistry::merge) from another registry, so adding one
//! custom metric does not require re-specifying the built-ins.
//!
//! # Built-in metrics
//!
//! | Name              | Value                                              |
//! |-------------------|----------------------------------------------------|
//! | `scroll-x`/`-y`   | raw scroll progress                                |
//! | `coverage-x`/`-y` | raw coverage                                       |
//! | `visible`         | 1 if both coverages are strictly positive, else 0  |
//! | `half-visible`    | 1 if both coverages are at least 0.5, else 0       |
//! | `quarter-visible` | 1 if both coverages are at least 0.25, else 0      |
//! | `cubic-x`/`-y`    | ease-in-out cubic of the corresponding coverage    |

use alloc::string::String;
use alloc::vec::Vec;

use crate::geometry::Snapshot;
use crate::node::NodeKey;

/// A derived metric: a pure function of a snapshot and the node it belongs to.
pub type MetricFn = fn(&Snapshot, NodeKey) -> f64;

#[derive(Clone)]
struct MetricEntry {
    name: String,
    func: MetricFn,
}

/// Ordered mapping from metric name to metric function.
#[derive(Clone)]
pub struct MetricRegistry {
    entries: Vec<MetricEntry>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl core::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}

impl MetricRegistry {
    /// Creates a registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry holding the built-in metrics, in their documented
    /// order.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert("scroll-x", |snap, _| snap.x_scroll_progress);
        registry.insert("scroll-y", |snap, _| snap.y_scroll_progress);
        registry.insert("coverage-x", |snap, _| snap.x_coverage);
        registry.insert("coverage-y", |snap, _| snap.y_coverage);
        registry.insert("visible", |snap, _| {
            f64::from(u8::from(snap.x_coverage > 0.0 && snap.y_coverage > 0.0))
        });
        registry.insert("half-visible", |snap, _| {
            f64::from(u8::from(snap.x_coverage >= 0.5 && snap.y_coverage >= 0.5))
        });
        registry.insert("quarter-visible", |snap, _| {
            f64::from(u8::from(snap.x_coverage >= 0.25 && snap.y_coverage >= 0.25))
        });
        registry.insert("cubic-x", |snap, _| ease_in_out_cubic(snap.x_coverage));
        registry.insert("cubic-y", |snap, _| ease_in_out_cubic(snap.y_coverage));
        registry
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether an entry named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Inserts a metric.
    ///
    /// If an entry with the same name exists, its function is replaced in
    /// place (keeping its position); otherwise the entry is appended.
    pub fn insert(&mut self, name: impl Into<String>, func: MetricFn) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.func = func;
        } else {
            self.entries.push(MetricEntry { name, func });
        }
    }

    /// Removes the entry named `name`, preserving the order of the rest.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }

    /// Inserts every entry of `other` into this registry, replacing entries
    /// with matching names.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries {
            self.insert(entry.name, entry.func);
        }
    }

    /// Iterates `(name, function)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricFn)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.func))
    }
}

/// The standard ease-in-out cubic curve.
///
/// `4t³` for `t < 0.5`, else `(t-1)(2t-2)² + 1`. Fixed points: 0 at 0,
/// 0.5 at 0.5, 1 at 1.
#[inline]
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}
