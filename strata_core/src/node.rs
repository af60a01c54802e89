// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identification and the ordered tracked set.
//!
//! [`NodeKey`] is a lightweight handle identifying a host document node.
//! Backends assign these; core treats them as opaque and never dereferences
//! them. The web backend, for example, keeps a `NodeKey → HtmlElement` table
//! and hands core only the keys.
//!
//! [`TrackedSet`] is the ordered collection of nodes currently bearing the
//! marker class. Membership is driven by the tracker's mutation methods;
//! each entry carries the node's last geometry [`Snapshot`] so the update
//! pass can apply the zero-coverage skip rule.

use alloc::vec::Vec;
use core::fmt;

use crate::geometry::Snapshot;

/// Identifies a host document node.
///
/// Backends assign node keys to distinguish tracked elements. Core code
/// passes them through without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeKey(pub u32);

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0)
    }
}

/// One tracked node: its host key plus the last stored snapshot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrackedNode {
    pub(crate) key: NodeKey,
    pub(crate) snapshot: Snapshot,
}

/// Ordered set of tracked nodes.
///
/// Insertion order is preserved across additions and removals, so style
/// writes happen in a deterministic order for a given mutation history.
#[derive(Debug, Default)]
pub struct TrackedSet {
    nodes: Vec<TrackedNode>,
}

impl TrackedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Returns the number of tracked nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether `key` is currently tracked.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.iter().any(|node| node.key == key)
    }

    /// Adds `key` with a zeroed snapshot if it is not already tracked.
    ///
    /// Returns `true` if the node was added.
    pub fn track(&mut self, key: NodeKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.nodes.push(TrackedNode {
            key,
            snapshot: Snapshot::ZERO,
        });
        true
    }

    /// Removes `key`, preserving the relative order of the remaining nodes.
    ///
    /// Returns `true` if the node was tracked.
    pub fn untrack(&mut self, key: NodeKey) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.key != key);
        self.nodes.len() != before
    }

    /// Returns the stored snapshot for `key`, if tracked.
    #[must_use]
    pub fn snapshot(&self, key: NodeKey) -> Option<Snapshot> {
        self.nodes
            .iter()
            .find(|node| node.key == key)
            .map(|node| node.snapshot)
    }

    /// Iterates tracked keys in set order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.iter().map(|node| node.key)
    }

    pub(crate) fn entries(&self) -> &[TrackedNode] {
        &self.nodes
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [TrackedNode] {
        &mut self.nodes
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn track_and_untrack() {
        let mut set = TrackedSet::new();
        assert!(set.track(NodeKey(1)), "first add succeeds");
        assert!(!set.track(NodeKey(1)), "duplicate add is a no-op");
        assert!(set.contains(NodeKey(1)), "tracked after add");

        assert!(set.untrack(NodeKey(1)), "removal of tracked node");
        assert!(!set.untrack(NodeKey(1)), "removal of untracked node");
        assert!(set.is_empty(), "empty after removal");
    }

    #[test]
    fn order_is_preserved_across_removal() {
        let mut set = TrackedSet::new();
        for i in 0..4 {
            set.track(NodeKey(i));
        }
        set.untrack(NodeKey(1));

        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, [NodeKey(0), NodeKey(2), NodeKey(3)]);
    }

    #[test]
    fn fresh_nodes_start_with_zero_snapshot() {
        let mut set = TrackedSet::new();
        set.track(NodeKey(7));
        let snap = set.snapshot(NodeKey(7)).expect("tracked");
        assert_eq!(snap, Snapshot::ZERO);
        assert_eq!(set.snapshot(NodeKey(8)), None, "untracked has no snapshot");
    }
}
