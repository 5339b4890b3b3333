//! One-shot reveal animations: a section gains the marker class the first time
//! enough of it is on screen, and keeps it for good.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::RevealConfig;
use crate::dom;

/// Absorbs f64 noise in the reported ratio at an exact threshold crossing.
const RATIO_SLACK: f64 = 1e-9;

/// Revealed flags for a fixed list of sections. Flags only ever go from
/// `false` to `true`.
#[derive(Clone, Debug)]
pub struct RevealSet {
    revealed: Vec<bool>,
    threshold: f64,
}

impl RevealSet {
    pub fn new(count: usize, threshold: f64) -> Self {
        Self { revealed: vec![false; count], threshold }
    }

    /// Feeds one observation. Returns `true` only when this call reveals the
    /// section; leaving the viewport never un-reveals.
    pub fn observe(&mut self, index: usize, intersecting: bool, ratio: f64) -> bool {
        let Some(flag) = self.revealed.get_mut(index) else { return false };
        if *flag || !intersecting || ratio + RATIO_SLACK < self.threshold {
            return false;
        }
        *flag = true;
        true
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn remaining(&self) -> usize {
        self.revealed.iter().filter(|r| !**r).count()
    }
}

struct RevealState {
    sections: Vec<Element>,
    set: RevealSet,
    class: String,
}

impl RevealState {
    fn on_entries(&mut self, entries: Array, observer: &IntersectionObserver) -> Result<(), JsValue> {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            let target = entry.target();
            let Some(index) = self.sections.iter().position(|s| *s == target) else { continue };
            if self.set.observe(index, entry.is_intersecting(), entry.intersection_ratio()) {
                target.class_list().add_1(&self.class)?;
                observer.unobserve(&target);
            }
        }
        Ok(())
    }
}

/// A single observer shared by all watched sections. Disconnects on drop.
pub struct RevealOnIntersect {
    observer: IntersectionObserver,
    state: Rc<RefCell<RevealState>>,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl RevealOnIntersect {
    /// Inert when the browser lacks `IntersectionObserver` or nothing matches.
    pub fn attach(document: &Document, config: &RevealConfig) -> Result<Option<Self>, JsValue> {
        let window = dom::window()?;
        if !js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false) {
            return Ok(None);
        }
        let sections = dom::query_all(document, &config.selector)?;
        if sections.is_empty() {
            return Ok(None);
        }

        let state = Rc::new(RefCell::new(RevealState {
            set: RevealSet::new(sections.len(), config.threshold),
            sections: sections.clone(),
            class: config.class.clone(),
        }));
        let cb_state = Rc::clone(&state);
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            if let Err(err) = cb_state.borrow_mut().on_entries(entries, &observer) {
                dom::report("reveal:", &err);
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for section in &sections {
            observer.observe(section);
        }
        Ok(Some(Self { observer, state, _callback: callback }))
    }

    pub fn revealed_count(&self) -> usize {
        let state = self.state.borrow();
        state.sections.len() - state.set.remaining()
    }
}

impl Drop for RevealOnIntersect {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
