//! Small helpers over `web_sys` shared by the components.
//!
//! The important piece is [`Listener`]: an event listener that owns its
//! closure and unregisters itself on drop, so a component's listeners live
//! exactly as long as the component value does.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn body(document: &Document) -> Result<HtmlElement, JsValue> {
    document.body().ok_or_else(|| JsValue::from_str("no body"))
}

/// `performance.now()`, or 0 when unavailable.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// First element matching `selector` in the document, if it has type `T`.
pub fn query<T: JsCast>(document: &Document, selector: &str) -> Result<Option<T>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<T>().ok()))
}

/// First descendant of `root` matching `selector`, if it has type `T`.
pub fn query_in<T: JsCast>(root: &Element, selector: &str) -> Result<Option<T>, JsValue> {
    Ok(root
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<T>().ok()))
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// All matching descendants of `root` that are `HtmlElement`s, in document order.
pub fn query_all_in(root: &Element, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

/// All matching elements in the document, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Animated scroll bringing `target`'s top edge to the viewport top.
pub fn scroll_into_view_smooth(target: &Element) {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&opts);
}

/// Animated scroll of the window back to offset 0.
pub fn scroll_window_to_top(window: &Window) {
    let opts = ScrollToOptions::new();
    opts.set_top(0.0);
    opts.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&opts);
}

/// Runs `f` once after `delay_ms`. The closure frees itself after firing.
pub fn defer<F: FnOnce() + 'static>(delay_ms: f64, f: F) -> Result<(), JsValue> {
    let callback = Closure::once_into_js(f);
    window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms.max(0.0).round() as i32,
    )?;
    Ok(())
}

pub fn report(context: &str, err: &JsValue) {
    web_sys::console::error_2(&JsValue::from_str(context), err);
}

/// Event listener owning its callback. Removed from its target on drop.
///
/// A listener can also be created detached and attached/detached repeatedly
/// without recreating the closure, which is how the drawer's key trap is
/// installed only while the drawer is open.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    attached: Cell<bool>,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Bubbling-phase listener, attached immediately.
    pub fn new<F>(target: &EventTarget, event: &'static str, f: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let listener = Self::build(target, event, false, f);
        listener.attach()?;
        Ok(listener)
    }

    /// Passive listener (never calls `preventDefault`), attached immediately.
    pub fn passive<F>(target: &EventTarget, event: &'static str, f: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let listener = Self::build(target, event, false, f);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            listener.callback.as_ref().unchecked_ref(),
            &opts,
        )?;
        listener.attached.set(true);
        Ok(listener)
    }

    /// Capture-phase listener that is not attached yet.
    pub fn detached_capture<F>(target: &EventTarget, event: &'static str, f: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        Self::build(target, event, true, f)
    }

    fn build<F>(target: &EventTarget, event: &'static str, capture: bool, f: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        Self {
            target: target.clone(),
            event,
            capture,
            attached: Cell::new(false),
            callback: Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn attach(&self) -> Result<(), JsValue> {
        if self.attached.get() {
            return Ok(());
        }
        self.target.add_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        )?;
        self.attached.set(true);
        Ok(())
    }

    pub fn detach(&self) -> Result<(), JsValue> {
        if !self.attached.get() {
            return Ok(());
        }
        self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        )?;
        self.attached.set(false);
        Ok(())
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.detach();
    }
}
