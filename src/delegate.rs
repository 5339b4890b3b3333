//! Delegated click handling.
//!
//! One document-level `click` listener feeds every event through an ordered
//! list of `(matcher, handler)` rules. Matchers look at the event target at
//! dispatch time, so elements added to the page later are handled too.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event};

use crate::dom::Listener;

/// What the dispatcher should do with the original event after a rule ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    PreventDefault,
    Continue,
}

type Matcher<T> = Box<dyn Fn(&T) -> Option<T>>;
type Handler<T> = Box<dyn FnMut(&T) -> Outcome>;

struct Rule<T> {
    name: &'static str,
    matcher: Matcher<T>,
    handler: Handler<T>,
}

/// Ordered rule list. The first rule whose matcher yields an element handles
/// the click; later rules are not consulted.
pub struct ClickRegistry<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for ClickRegistry<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> ClickRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. `matcher` maps the event target to the element the rule
    /// cares about (typically via `closest`), `handler` acts on that element.
    pub fn register<M, H>(&mut self, name: &'static str, matcher: M, handler: H)
    where
        M: Fn(&T) -> Option<T> + 'static,
        H: FnMut(&T) -> Outcome + 'static,
    {
        self.rules.push(Rule { name, matcher: Box::new(matcher), handler: Box::new(handler) });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    /// `None` when no rule matched.
    pub fn dispatch(&mut self, target: &T) -> Option<Outcome> {
        self.rules.iter_mut().find_map(|rule| {
            let matched = (rule.matcher)(target)?;
            Some((rule.handler)(&matched))
        })
    }
}

/// The document-level listener plus its registry.
pub struct ClickRouter {
    registry: Rc<RefCell<ClickRegistry<Element>>>,
    _listener: Listener,
}

impl ClickRouter {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let registry: Rc<RefCell<ClickRegistry<Element>>> = Rc::new(RefCell::new(ClickRegistry::new()));
        let dispatch = Rc::clone(&registry);
        let listener = Listener::new(document, "click", move |event: Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            // A handler may synthesize a click of its own; skip re-entry.
            let Ok(mut registry) = dispatch.try_borrow_mut() else { return };
            if registry.dispatch(&target) == Some(Outcome::PreventDefault) {
                event.prevent_default();
            }
        })?;
        Ok(Self { registry, _listener: listener })
    }

    pub fn register<M, H>(&self, name: &'static str, matcher: M, handler: H)
    where
        M: Fn(&Element) -> Option<Element> + 'static,
        H: FnMut(&Element) -> Outcome + 'static,
    {
        self.registry.borrow_mut().register(name, matcher, handler);
    }

    pub fn rule_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

/// Matcher helper: nearest ancestor-or-self matching `selector`.
pub fn closest(target: &Element, selector: &str) -> Option<Element> {
    target.closest(selector).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Targets are paths like "nav/a.scroll"; a matcher "closest" walks up the slashes.
    fn closest_with(target: &String, suffix: &str) -> Option<String> {
        let mut cur = target.as_str();
        loop {
            if cur.rsplit('/').next().is_some_and(|leaf| leaf.ends_with(suffix)) {
                return Some(cur.to_string());
            }
            cur = cur.rsplit_once('/')?.0;
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut reg: ClickRegistry<String> = ClickRegistry::new();
        let h1 = Rc::clone(&hits);
        reg.register("drawer-link", |t| closest_with(t, ".link"), move |m| {
            h1.borrow_mut().push(format!("drawer:{m}"));
            Outcome::PreventDefault
        });
        let h2 = Rc::clone(&hits);
        reg.register("scroll", |t| closest_with(t, ".scroll"), move |m| {
            h2.borrow_mut().push(format!("scroll:{m}"));
            Outcome::Continue
        });

        assert_eq!(reg.dispatch(&"page/a.scroll/span".to_string()), Some(Outcome::Continue));
        assert_eq!(reg.dispatch(&"page/a.scroll.link".to_string()), Some(Outcome::PreventDefault));
        assert_eq!(reg.dispatch(&"page/button".to_string()), None);
        assert_eq!(
            *hits.borrow(),
            vec!["scroll:page/a.scroll".to_string(), "drawer:page/a.scroll.link".to_string()]
        );
    }

    #[test]
    fn rules_added_after_first_dispatch_apply() {
        let count = Rc::new(Cell::new(0));
        let mut reg: ClickRegistry<String> = ClickRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.dispatch(&"x.scroll".to_string()), None);
        let c = Rc::clone(&count);
        reg.register("scroll", |t| closest_with(t, ".scroll"), move |_| {
            c.set(c.get() + 1);
            Outcome::PreventDefault
        });
        assert_eq!(reg.dispatch(&"x.scroll".to_string()), Some(Outcome::PreventDefault));
        assert_eq!(count.get(), 1);
        assert_eq!(reg.rule_names().collect::<Vec<_>>(), vec!["scroll"]);
    }
}
