// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for strata.
//!
//! This crate wires [`strata_core`]'s tracker to the browser:
//!
//! - [`RafLoop`]: `requestAnimationFrame` tick source with an explicit stop
//!   token
//! - [`NodeRegistry`], [`DomGeometry`], [`DomStyles`]: the `NodeKey ↔ element`
//!   table and the DOM-backed geometry/style trait implementations
//! - [`Engine`]: the assembled instance — marker-class seeding, scroll and
//!   resize listeners, a `MutationObserver` for membership, and the frame
//!   loop that runs the tracker's update pass
//!
//! ```no_run
//! use strata_backend_web::Engine;
//! use strata_core::config::TrackerConfig;
//!
//! let engine = Engine::start(TrackerConfig::default())?;
//! // ... later:
//! engine.stop();
//! # Ok::<(), wasm_bindgen::JsValue>(())
//! ```

#![no_std]

extern crate alloc;

mod dom;
mod observer;
mod raf;

pub use dom::{DomGeometry, DomStyles, NodeRegistry};
pub use raf::RafLoop;
pub use strata_core::backend::{GeometrySource, StyleSink};

use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    Document, Element, HtmlElement, MutationObserver, MutationObserverInit, Window,
};

use strata_core::config::TrackerConfig;
use strata_core::tracker::Tracker;

/// State shared between the frame loop, the event listeners, and the
/// mutation observer. Everything runs on the main thread, so a plain
/// `Rc<RefCell<..>>` suffices.
struct Shared {
    tracker: Tracker,
    registry: NodeRegistry,
}

/// A running parallax instance bound to the current document.
///
/// [`Engine::start`] seeds the tracker from elements already bearing the
/// marker class, installs scroll/resize dirty listeners and a
/// `MutationObserver` for membership changes, and starts the frame loop.
/// [`stop`](Self::stop) (or dropping the engine) tears all of that down;
/// custom properties already written are left in place.
pub struct Engine {
    state: Rc<RefCell<Shared>>,
    raf: RafLoop,
    observer: MutationObserver,
    window: Window,
    document: Document,
    scroll_closure: Closure<dyn FnMut()>,
    resize_closure: Closure<dyn FnMut()>,
    // Kept alive for the observer; referenced only from the JS side.
    _observer_closure: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Engine {
    /// Builds and starts an instance against the current document.
    ///
    /// # Errors
    ///
    /// Fails if the global `window`, its document, or the document element is
    /// unavailable, or if observer registration is rejected.
    pub fn start(config: TrackerConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;

        let marker_class = config.marker_class.clone();
        let mut tracker = Tracker::new(config);
        let mut registry = NodeRegistry::new();
        seed(&document, &marker_class, &mut tracker, &mut registry)?;

        let state = Rc::new(RefCell::new(Shared { tracker, registry }));

        let scroll_closure = dirty_listener(&state, Tracker::on_scroll);
        document.add_event_listener_with_callback(
            "scroll",
            scroll_closure.as_ref().unchecked_ref(),
        )?;

        let resize_closure = dirty_listener(&state, Tracker::on_resize);
        window.add_event_listener_with_callback(
            "resize",
            resize_closure.as_ref().unchecked_ref(),
        )?;

        let observer_closure = Closure::new({
            let state = Rc::clone(&state);
            move |records: js_sys::Array, _observer: MutationObserver| {
                let shared = &mut *state.borrow_mut();
                observer::apply_mutations(
                    &records,
                    &mut shared.tracker,
                    &mut shared.registry,
                    &marker_class,
                );
            }
        });
        let mutation_observer = MutationObserver::new(observer_closure.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_child_list(true);
        init.set_subtree(true);
        mutation_observer.observe_with_options(&root, &init)?;

        let raf = RafLoop::new({
            let state = Rc::clone(&state);
            let root: Element = root.clone();
            move |tick| {
                let shared = &mut *state.borrow_mut();
                let geometry = DomGeometry::new(&root, &shared.registry);
                let mut styles = DomStyles::new(&shared.registry);
                let _ = shared.tracker.on_tick(&tick, &geometry, &mut styles);
            }
        });
        raf.start();

        Ok(Self {
            state,
            raf,
            observer: mutation_observer,
            window,
            document,
            scroll_closure,
            resize_closure,
            _observer_closure: observer_closure,
        })
    }

    /// Stops the frame loop and detaches listeners and the observer.
    ///
    /// Idempotent. The engine can not be restarted; build a new one instead.
    pub fn stop(&self) {
        self.raf.stop();
        self.observer.disconnect();
        let _ = self.document.remove_event_listener_with_callback(
            "scroll",
            self.scroll_closure.as_ref().unchecked_ref(),
        );
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.resize_closure.as_ref().unchecked_ref(),
        );
    }

    /// Returns `true` while the frame loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.raf.is_running()
    }

    /// Forces a full refresh on the next frame.
    pub fn mark_dirty(&self) {
        self.state.borrow_mut().tracker.mark_dirty();
    }

    /// Runs `f` against the tracker, e.g. to replace the metric registry.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&mut Tracker) -> R) -> R {
        f(&mut self.state.borrow_mut().tracker)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("running", &self.raf.is_running())
            .finish_non_exhaustive()
    }
}

/// Registers every element currently bearing the marker class.
fn seed(
    document: &Document,
    marker_class: &str,
    tracker: &mut Tracker,
    registry: &mut NodeRegistry,
) -> Result<(), JsValue> {
    let matches = document.query_selector_all(&format!(".{marker_class}"))?;
    for i in 0..matches.length() {
        if let Some(node) = matches.item(i)
            && let Ok(element) = node.dyn_into::<HtmlElement>()
        {
            let key = registry.intern(&element);
            tracker.on_nodes_added([(key, true)]);
        }
    }
    Ok(())
}

/// Builds a zero-argument event listener that forwards to a tracker method.
fn dirty_listener(
    state: &Rc<RefCell<Shared>>,
    notify: fn(&mut Tracker),
) -> Closure<dyn FnMut()> {
    let state = Rc::clone(state);
    Closure::new(move || notify(&mut state.borrow_mut().tracker))
}
