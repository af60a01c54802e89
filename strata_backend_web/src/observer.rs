// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `MutationObserver` glue.
//!
//! Translates a batch of DOM [`MutationRecord`]s into the tracker's
//! host-neutral membership methods. Records are processed in delivery order:
//!
//! - `childList` records: every removed node known to the registry is
//!   untracked and its slot released; every added element bearing the marker
//!   class is interned and tracked.
//! - `attributes` records for `class`: the target's current `classList`
//!   decides whether it is tracked or untracked.
//!
//! Class membership is always answered against the *current* `classList`,
//! not the mutation's old value, so a burst of class flips converges on the
//! final state.

use js_sys::Array;
use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement, MutationRecord};

use strata_core::node::NodeKey;
use strata_core::tracker::Tracker;

use crate::dom::NodeRegistry;

/// Applies one observer callback's record batch to the tracker.
pub(crate) fn apply_mutations(
    records: &Array,
    tracker: &mut Tracker,
    registry: &mut NodeRegistry,
    marker_class: &str,
) {
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        match record.type_().as_str() {
            "childList" => apply_child_list(&record, tracker, registry, marker_class),
            "attributes" => apply_attributes(&record, tracker, registry, marker_class),
            _ => {}
        }
    }
}

fn apply_child_list(
    record: &MutationRecord,
    tracker: &mut Tracker,
    registry: &mut NodeRegistry,
    marker_class: &str,
) {
    let removed = record.removed_nodes();
    for i in 0..removed.length() {
        if let Some(node) = removed.get(i)
            && let Some(element) = node.dyn_ref::<Element>()
            && let Some(key) = registry.key_of(element)
        {
            tracker.on_nodes_removed([key]);
            registry.release(key);
        }
    }

    let added = record.added_nodes();
    for i in 0..added.length() {
        if let Some(node) = added.get(i)
            && let Some(element) = node.dyn_ref::<HtmlElement>()
            && element.class_list().contains(marker_class)
        {
            let key = registry.intern(element);
            tracker.on_nodes_added([(key, true)]);
        }
    }
}

fn apply_attributes(
    record: &MutationRecord,
    tracker: &mut Tracker,
    registry: &mut NodeRegistry,
    marker_class: &str,
) {
    if record.attribute_name().as_deref() != Some("class") {
        return;
    }
    let Some(element) = record
        .target()
        .and_then(|target| target.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    let bears_marker = element.class_list().contains(marker_class);
    let key: Option<NodeKey> = if bears_marker {
        Some(registry.intern(&element))
    } else {
        registry.key_of(element.as_ref())
    };
    if let Some(key) = key {
        tracker.on_attribute_changed(key, bears_marker);
        if !bears_marker {
            registry.release(key);
        }
    }
}
