//! Timers, observers, and listeners driving the attachment controller.
//!
//! Everything runs on the single wasm main thread; each callback borrows
//! the shared state cell for one synchronous step and releases it before
//! anything else can fire. Cancellation is ownership: dropping the runtime
//! drops the probe interval, the mutation observer closure, the input
//! listeners, and (through `PageDom`) the preview surface.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_timers::callback::{Interval, Timeout};
use texpane_core::{
    AttachController, ProbeOutcome, Theme, PASTE_SETTLE_MS, PROBE_INTERVAL_MS,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MutationObserver, MutationObserverInit};

use crate::katex::PageKatex;
use crate::page::PageDom;

struct RuntimeState {
    controller: AttachController<PageDom>,
    page: PageDom,
    typesetter: PageKatex,
    probe: Option<Interval>,
    listeners: Vec<EventListener>,
}

type Shared = Rc<RefCell<RuntimeState>>;

/// The live preview pipeline: one per page, owned by the binding layer.
pub struct PreviewRuntime {
    inner: Shared,
    observer: MutationObserver,
    _observer_callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl PreviewRuntime {
    /// Start the acquisition probe and the structural-change watcher.
    ///
    /// The watcher observes the whole body subtree for the lifetime of the
    /// runtime; the probe runs only while there is something to search for.
    pub fn start(theme: Theme) -> Result<PreviewRuntime, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let inner: Shared = Rc::new(RefCell::new(RuntimeState {
            controller: AttachController::new(),
            page: PageDom::new(document, theme),
            typesetter: PageKatex,
            probe: None,
            listeners: Vec::new(),
        }));

        start_probe(&inner);

        let observed = Rc::clone(&inner);
        let observer_callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                on_subtree_change(&observed);
            },
        );
        let observer = MutationObserver::new(observer_callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;

        tracing::info!("math preview runtime started");
        Ok(PreviewRuntime {
            inner,
            observer,
            _observer_callback: observer_callback,
        })
    }

    /// Restyle a mounted surface and remember the theme for future mounts.
    pub fn set_theme(&self, theme: Theme) {
        self.inner.borrow_mut().page.set_theme(theme);
    }

    /// Whether a composer is currently adopted.
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().controller.is_attached()
    }
}

impl Drop for PreviewRuntime {
    fn drop(&mut self) {
        self.observer.disconnect();
        let mut state = self.inner.borrow_mut();
        state.probe = None;
        state.listeners.clear();
        let RuntimeState {
            controller, page, ..
        } = &mut *state;
        controller.detach(page);
        tracing::info!("math preview runtime stopped");
    }
}

fn start_probe(inner: &Shared) {
    let ticked = Rc::clone(inner);
    let probe = Interval::new(PROBE_INTERVAL_MS, move || on_probe_tick(&ticked));
    let mut state = inner.borrow_mut();
    state.controller.reset_probe();
    state.probe = Some(probe);
}

fn on_probe_tick(inner: &Shared) {
    let outcome = {
        let mut state = inner.borrow_mut();
        let RuntimeState {
            controller, page, ..
        } = &mut *state;
        controller.on_probe_tick(page)
    };
    match outcome {
        ProbeOutcome::Continue => {}
        ProbeOutcome::Expired => {
            inner.borrow_mut().probe.take();
        }
        ProbeOutcome::Adopted(target) => {
            let mut state = inner.borrow_mut();
            state.probe.take();
            state.listeners = composer_listeners(inner, &target);
            drop(state);
            // Catch up with whatever is already typed.
            sync_preview(inner);
        }
    }
}

/// Wire text-change notifications to an adopted composer. The listener
/// handles live in the runtime state, not on the element: when the
/// composer is discarded they are simply dropped with it.
fn composer_listeners(inner: &Shared, target: &Element) -> Vec<EventListener> {
    let mut listeners = Vec::with_capacity(3);
    for event in ["input", "keyup"] {
        let synced = Rc::clone(inner);
        listeners.push(EventListener::new(target, event, move |_| {
            sync_preview(&synced);
        }));
    }
    // Sampling right inside the paste event would read the text before the
    // host page finishes inserting the pasted content; give it a moment.
    let pasted = Rc::clone(inner);
    listeners.push(EventListener::new(target, "paste", move |_| {
        let synced = Rc::clone(&pasted);
        Timeout::new(PASTE_SETTLE_MS, move || sync_preview(&synced)).forget();
    }));
    listeners
}

fn sync_preview(inner: &Shared) {
    let mut state = inner.borrow_mut();
    let RuntimeState {
        controller,
        page,
        typesetter,
        ..
    } = &mut *state;
    controller.on_composer_input(page, typesetter);
}

fn on_subtree_change(inner: &Shared) {
    let needs_probe = {
        let mut state = inner.borrow_mut();
        let RuntimeState {
            controller,
            page,
            listeners,
            ..
        } = &mut *state;
        let warranted = controller.on_subtree_change(page);
        if warranted && !listeners.is_empty() {
            // Listeners on the departed composer die with it.
            listeners.clear();
        }
        warranted && state.probe.is_none()
    };
    if needs_probe {
        start_probe(inner);
    }
}
