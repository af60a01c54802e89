// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed geometry source and style sink.
//!
//! Core addresses nodes by opaque [`NodeKey`] handles; this module owns the
//! `NodeKey → HtmlElement` table ([`NodeRegistry`]) and the two trait
//! implementations that bridge the live document:
//!
//! - [`DomGeometry`] reads bounding client rects, offset geometry, and the
//!   root element's client extent and scroll offsets.
//! - [`DomStyles`] writes custom properties via `style.setProperty`.
//!
//! Both borrow the registry immutably, so a single update pass can hold one
//! of each. Per the core contract, the tracker finishes all geometry reads
//! before the first style write, keeping the browser from interleaving
//! forced layout flushes with style mutation.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use web_sys::{Element, HtmlElement};

use strata_core::backend::{GeometrySource, StyleSink};
use strata_core::geometry::{NodeGeometry, Viewport};
use strata_core::node::NodeKey;

/// Maps [`NodeKey`] handles to live DOM elements.
///
/// Keys are slot indices into an element table. Slots of removed elements are
/// cleared but not reused; the original keys stay stale, matching core's
/// treatment of keys as opaque one-shot handles.
#[derive(Default)]
pub struct NodeRegistry {
    elements: Vec<Option<HtmlElement>>,
}

impl core::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("slots", &self.elements.len())
            .finish()
    }
}

impl NodeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key for `element`, registering it if unknown.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the element table is far smaller than u32::MAX slots"
    )]
    pub fn intern(&mut self, element: &HtmlElement) -> NodeKey {
        if let Some(key) = self.key_of(element) {
            return key;
        }
        let key = NodeKey(self.elements.len() as u32);
        self.elements.push(Some(element.clone()));
        key
    }

    /// Returns the key for `element` if it is registered.
    ///
    /// Element identity is JS reference equality, so this is a linear scan
    /// over the table. Tracked sets are small; mutation batches are smaller.
    #[must_use]
    pub fn key_of(&self, element: &Element) -> Option<NodeKey> {
        let idx = self.elements.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|el| AsRef::<Element>::as_ref(el) == element)
        })?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "indices come from a table capped well below u32::MAX"
        )]
        let key = NodeKey(idx as u32);
        Some(key)
    }

    /// Returns the element for `key`, if still registered.
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&HtmlElement> {
        self.elements
            .get(key.0 as usize)
            .and_then(|slot| slot.as_ref())
    }

    /// Clears the slot for `key`, returning the element if it was present.
    pub fn release(&mut self, key: NodeKey) -> Option<HtmlElement> {
        self.elements.get_mut(key.0 as usize)?.take()
    }
}

/// [`GeometrySource`] over the live document.
///
/// `root` is the scrolling element (normally `document.documentElement`),
/// which provides both the client extent and the document scroll offsets.
#[derive(Debug)]
pub struct DomGeometry<'a> {
    root: &'a Element,
    registry: &'a NodeRegistry,
}

impl<'a> DomGeometry<'a> {
    /// Creates a geometry source reading from `root` and `registry`.
    #[must_use]
    pub fn new(root: &'a Element, registry: &'a NodeRegistry) -> Self {
        Self { root, registry }
    }
}

impl GeometrySource for DomGeometry<'_> {
    fn viewport(&self) -> Viewport {
        Viewport {
            width: f64::from(self.root.client_width()),
            height: f64::from(self.root.client_height()),
            scroll_left: f64::from(self.root.scroll_left()),
            scroll_top: f64::from(self.root.scroll_top()),
        }
    }

    fn node_geometry(&self, node: NodeKey) -> NodeGeometry {
        let Some(element) = self.registry.get(node) else {
            // Released or never-registered key: zeroed geometry, which the
            // skip rule treats as off-screen.
            return NodeGeometry::default();
        };
        let rect = element.get_bounding_client_rect();
        NodeGeometry {
            bounds: Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom()),
            offset: Point::new(
                f64::from(element.offset_left()),
                f64::from(element.offset_top()),
            ),
            size: Size::new(
                f64::from(element.offset_width()),
                f64::from(element.offset_height()),
            ),
        }
    }
}

/// [`StyleSink`] writing custom properties onto registered elements.
///
/// Write failures (e.g. invalid property names) are discarded; style writes
/// in a live document are assumed to succeed.
#[derive(Debug)]
pub struct DomStyles<'a> {
    registry: &'a NodeRegistry,
}

impl<'a> DomStyles<'a> {
    /// Creates a style sink over `registry`.
    #[must_use]
    pub fn new(registry: &'a NodeRegistry) -> Self {
        Self { registry }
    }
}

impl StyleSink for DomStyles<'_> {
    fn set_custom_property(&mut self, node: NodeKey, name: &str, value: &str) {
        if let Some(element) = self.registry.get(node) {
            let _ = element.style().set_property(name, value);
        }
    }
}
