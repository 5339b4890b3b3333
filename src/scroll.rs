//! In-page smooth scrolling and the "back to top" button.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::{ScrollConfig, ToTopConfig};
use crate::delegate::{self, ClickRouter, Outcome};
use crate::dom::{self, Listener};

/// Any click on `a[data-scroll]` (by default) scrolls to the element its
/// attribute names instead of navigating. Handled through the shared
/// [`ClickRouter`], so links inserted later work as well.
pub struct SmoothScrollRouter;

impl SmoothScrollRouter {
    pub fn install(router: &ClickRouter, document: &Document, config: &ScrollConfig) -> Self {
        let selector = config.link_selector();
        let attribute = config.target_attribute.clone();
        let target_attribute = attribute.clone();
        let doc = document.clone();
        router.register(
            "smooth-scroll",
            move |target: &Element| {
                let link = delegate::closest(target, &selector)?;
                // an empty reference is not a scroll link
                link.get_attribute(&attribute)
                    .is_some_and(|s| !s.is_empty())
                    .then_some(link)
            },
            move |link: &Element| {
                let target = link
                    .get_attribute(&target_attribute)
                    .and_then(|sel| doc.query_selector(&sel).ok().flatten());
                // a dangling reference still suppresses navigation
                if let Some(target) = target {
                    dom::scroll_into_view_smooth(&target);
                }
                Outcome::PreventDefault
            },
        );
        SmoothScrollRouter
    }
}

/// Visible strictly past the threshold.
pub fn should_show_to_top(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub struct ScrollToTopButton {
    button: HtmlElement,
    _listeners: [Listener; 2],
}

impl ScrollToTopButton {
    pub fn attach(document: &Document, config: &ToTopConfig) -> Result<Option<Self>, JsValue> {
        let Some(button) = dom::by_id::<HtmlElement>(document, &config.element_id) else {
            return Ok(None);
        };
        let window = dom::window()?;

        let sync = {
            let button = button.clone();
            let class = config.class.clone();
            let threshold = config.threshold_px;
            move |window: &Window| {
                let y = window.scroll_y().unwrap_or(0.0);
                let _ = button
                    .class_list()
                    .toggle_with_force(&class, should_show_to_top(y, threshold));
            }
        };
        // match the current offset before the first scroll event
        sync(&window);

        let on_scroll = {
            let win = window.clone();
            Listener::passive(&window, "scroll", move |_| sync(&win))?
        };
        let on_click = Listener::new(&button, "click", move |_| dom::scroll_window_to_top(&window))?;

        Ok(Some(Self { button, _listeners: [on_scroll, on_click] }))
    }

    pub fn is_shown(&self, config: &ToTopConfig) -> bool {
        self.button.class_list().contains(&config.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        assert!(!should_show_to_top(0.0, 250.0));
        assert!(!should_show_to_top(250.0, 250.0));
        assert!(should_show_to_top(250.5, 250.0));
    }
}
