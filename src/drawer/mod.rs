//! Off-canvas navigation drawer.
//!
//! Opening marks the toggle expanded, shows the overlay, locks page scroll,
//! moves focus into the drawer and installs a capturing `keydown` trap
//! (Escape closes, Tab / Shift+Tab wrap among the drawer's focusables).
//! Closing reverses all of it. The trap listener is attached exactly while
//! the drawer is open, including when a wide viewport forces it shut.
//!
//! The transition logic lives in [`state`]; this module only applies it to
//! the page.

mod state;

pub use state::{
    CloseReason, DrawerFlags, DrawerMachine, DrawerState, InitialFocus, LinkAction, Transition,
    TrapKey, initial_focus, link_action, wrap_target,
};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MediaQueryList, MediaQueryListEvent};

use crate::config::{DrawerConfig, ScrollConfig};
use crate::delegate::{self, ClickRouter, Outcome};
use crate::dom::{self, Listener};

const FOCUSABLE: &str = "a[href], button:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

struct DrawerInner {
    machine: DrawerMachine,
    document: Document,
    body: HtmlElement,
    toggle: HtmlElement,
    drawer: HtmlElement,
    overlay: HtmlElement,
    close_control: Option<HtmlElement>,
    config: DrawerConfig,
    key_trap: Listener,
}

impl DrawerInner {
    fn focusables(&self) -> Vec<HtmlElement> {
        dom::query_all_in(&self.drawer, FOCUSABLE).unwrap_or_default()
    }

    fn open(&mut self) -> Result<(), JsValue> {
        match self.machine.open() {
            Some(t) => self.apply(t),
            None => Ok(()),
        }
    }

    fn close(&mut self, reason: CloseReason) -> Result<(), JsValue> {
        match self.machine.close(reason) {
            Some(t) => self.apply(t),
            None => Ok(()),
        }
    }

    fn toggle(&mut self) -> Result<(), JsValue> {
        match self.machine.toggle() {
            Some(t) => self.apply(t),
            None => Ok(()),
        }
    }

    fn apply(&self, transition: Transition) -> Result<(), JsValue> {
        let flags = transition.target().flags();
        let cfg = &self.config;

        self.toggle
            .set_attribute("aria-expanded", if flags.aria_expanded { "true" } else { "false" })?;
        let label = if flags.aria_expanded { &cfg.close_label } else { &cfg.open_label };
        self.toggle.set_attribute("aria-label", label)?;
        self.drawer
            .class_list()
            .toggle_with_force(&cfg.open_class, flags.open_marker)?;

        // unhide before fading in; fade out before hiding
        if flags.overlay_visible {
            self.overlay.set_hidden(false);
            self.overlay.class_list().add_1(&cfg.overlay_class)?;
        } else {
            self.overlay.class_list().remove_1(&cfg.overlay_class)?;
            self.overlay.set_hidden(true);
        }

        let overflow = if flags.scroll_locked { "hidden" } else { "" };
        self.body.style().set_property("overflow", overflow)?;

        if flags.key_trap_installed {
            self.key_trap.attach()?;
        } else {
            self.key_trap.detach()?;
        }

        match transition {
            Transition::Opened => self.focus_first()?,
            Transition::Closed { restore_focus: true } => self.toggle.focus()?,
            Transition::Closed { restore_focus: false } => {}
        }
        Ok(())
    }

    fn focus_first(&self) -> Result<(), JsValue> {
        let focusables = self.focusables();
        match initial_focus(focusables.len(), self.close_control.is_some()) {
            InitialFocus::FirstFocusable => focusables[0].focus(),
            InitialFocus::CloseControl => match &self.close_control {
                Some(close) => close.focus(),
                None => self.toggle.focus(),
            },
            InitialFocus::Toggle => self.toggle.focus(),
        }
    }

    fn on_key(&mut self, event: &KeyboardEvent) -> Result<(), JsValue> {
        if !self.machine.state().is_open() {
            return Ok(());
        }
        match TrapKey::from_key(&event.key(), event.shift_key()) {
            TrapKey::Escape => {
                event.prevent_default();
                self.close(CloseReason::Escape)
            }
            TrapKey::Tab { backwards } => {
                let focusables = self.focusables();
                if focusables.is_empty() {
                    // nothing to cycle through; keep focus where it is
                    event.prevent_default();
                    return Ok(());
                }
                let active = self.document.active_element();
                let position = active.and_then(|active| {
                    focusables
                        .iter()
                        .position(|f| AsRef::<Element>::as_ref(f) == &active)
                });
                if let Some(idx) = wrap_target(position, focusables.len(), backwards) {
                    event.prevent_default();
                    focusables[idx].focus()?;
                }
                Ok(())
            }
            TrapKey::Other => Ok(()),
        }
    }
}

/// Builds an event callback that runs `f` against the live drawer, if any.
/// Re-entrant events (fired while the drawer is mid-update) are dropped.
fn on_drawer<F>(weak: Weak<RefCell<DrawerInner>>, mut f: F) -> impl FnMut(Event) + 'static
where
    F: FnMut(&mut DrawerInner, &Event) -> Result<(), JsValue> + 'static,
{
    move |event: Event| {
        let Some(inner) = weak.upgrade() else { return };
        let Ok(mut drawer) = inner.try_borrow_mut() else { return };
        if let Err(err) = f(&mut drawer, &event) {
            dom::report("nav drawer:", &err);
        }
    }
}

pub struct NavDrawer {
    inner: Rc<RefCell<DrawerInner>>,
    breakpoint: Option<MediaQueryList>,
    _listeners: Vec<Listener>,
}

impl NavDrawer {
    /// Wires the drawer. Inert (`Ok(None)`) unless toggle, drawer and overlay
    /// all exist; the explicit close control is optional.
    pub fn attach(
        document: &Document,
        config: &DrawerConfig,
        scroll: &ScrollConfig,
        router: &ClickRouter,
    ) -> Result<Option<Self>, JsValue> {
        let Some(toggle) = dom::query::<HtmlElement>(document, &config.toggle_selector)? else {
            return Ok(None);
        };
        let Some(drawer) = dom::by_id::<HtmlElement>(document, &config.drawer_id) else {
            return Ok(None);
        };
        let Some(overlay) = dom::query::<HtmlElement>(document, &config.overlay_selector)? else {
            return Ok(None);
        };
        let close_control = dom::query_in::<HtmlElement>(&drawer, &config.close_selector)?;
        let body = dom::body(document)?;
        let window = dom::window()?;

        toggle.set_attribute("type", "button")?;

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<DrawerInner>>| {
            let key_trap = Listener::detached_capture(
                document,
                "keydown",
                on_drawer(weak.clone(), |d, event| match event.dyn_ref::<KeyboardEvent>() {
                    Some(key) => d.on_key(key),
                    None => Ok(()),
                }),
            );
            RefCell::new(DrawerInner {
                machine: DrawerMachine::new(),
                document: document.clone(),
                body,
                toggle: toggle.clone(),
                drawer: drawer.clone(),
                overlay: overlay.clone(),
                close_control: close_control.clone(),
                config: config.clone(),
                key_trap,
            })
        });

        let weak = Rc::downgrade(&inner);
        let mut listeners = vec![
            Listener::new(&toggle, "click", on_drawer(weak.clone(), |d, _| d.toggle()))?,
            Listener::new(&overlay, "click", on_drawer(weak.clone(), |d, _| d.close(CloseReason::Overlay)))?,
        ];
        if let Some(close) = &close_control {
            listeners.push(Listener::new(
                close,
                "click",
                on_drawer(weak.clone(), |d, _| d.close(CloseReason::CloseControl)),
            )?);
        }
        let breakpoint = window.match_media(&config.desktop_query())?;
        if let Some(query) = &breakpoint {
            listeners.push(Listener::new(
                query,
                "change",
                on_drawer(weak.clone(), |d, event| {
                    let widened = event
                        .dyn_ref::<MediaQueryListEvent>()
                        .is_some_and(|e| e.matches());
                    if widened { d.close(CloseReason::ViewportWidened) } else { Ok(()) }
                }),
            )?);
        }

        register_link_rule(router, weak, drawer.into(), document.clone(), config, scroll);
        Ok(Some(Self { inner, breakpoint, _listeners: listeners }))
    }

    pub fn state(&self) -> DrawerState {
        self.inner.borrow().machine.state()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// The desktop-width query whose `change` events force the drawer shut.
    pub fn breakpoint_query(&self) -> Option<&MediaQueryList> {
        self.breakpoint.as_ref()
    }

    pub fn key_trap_installed(&self) -> bool {
        self.inner.borrow().key_trap.is_attached()
    }

    pub fn open(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().open()
    }

    pub fn close(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().close(CloseReason::CloseControl)
    }

    pub fn toggle(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().toggle()
    }
}

impl Drop for NavDrawer {
    fn drop(&mut self) {
        // leave the page unlocked when torn down while open
        if let Ok(mut d) = self.inner.try_borrow_mut() {
            let _ = d.close(CloseReason::CloseControl);
        }
    }
}

/// Links inside the open drawer close it first, then (after a short delay so
/// the close animation can start) scroll to their target or navigate away.
fn register_link_rule(
    router: &ClickRouter,
    weak: Weak<RefCell<DrawerInner>>,
    drawer: Element,
    document: Document,
    config: &DrawerConfig,
    scroll: &ScrollConfig,
) {
    let target_attribute = scroll.target_attribute.clone();
    let delay_ms = config.navigate_delay_ms;
    let matcher_weak = weak.clone();

    router.register(
        "drawer-link",
        move |target: &Element| {
            let inner = matcher_weak.upgrade()?;
            let open = inner.try_borrow().is_ok_and(|d| d.machine.state().is_open());
            if !open {
                return None;
            }
            let link = delegate::closest(target, "a[href]")?;
            let node: &web_sys::Node = &link;
            drawer.contains(Some(node)).then_some(link)
        },
        move |link: &Element| {
            let scroll_target = link
                .get_attribute(&target_attribute)
                .filter(|s| !s.is_empty())
                .and_then(|sel| document.query_selector(&sel).ok().flatten());
            let href = link.get_attribute("href");

            if let Some(inner) = weak.upgrade() {
                if let Ok(mut d) = inner.try_borrow_mut() {
                    if let Err(err) = d.close(CloseReason::LinkActivated) {
                        dom::report("nav drawer:", &err);
                    }
                }
            }

            let deferred = match link_action(scroll_target, href.as_deref()) {
                LinkAction::ScrollTo(target) => {
                    dom::defer(delay_ms, move || dom::scroll_into_view_smooth(&target))
                }
                LinkAction::Navigate(href) => dom::defer(delay_ms, move || {
                    if let Some(win) = web_sys::window() {
                        let _ = win.location().set_href(&href);
                    }
                }),
                LinkAction::Stay => Ok(()),
            };
            if let Err(err) = deferred {
                dom::report("nav drawer:", &err);
            }
            Outcome::PreventDefault
        },
    );
}
