//! Cosmos Folio: the client-side behaviour of a single-page portfolio.
//!
//! `start()` wires every enhancement to the current document: the typing
//! headline, smooth in-page scrolling, the mobile navigation drawer, reveal on
//! scroll, the confirm-before-download CV link, the back-to-top button and the
//! animated cosmic background. Each one is independent and stays inert when its
//! elements are missing. `dispose()` detaches everything again.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Document;

pub mod config;
pub mod cosmos;
pub mod delegate;
pub mod dom;
pub mod download;
pub mod drawer;
pub mod random;
pub mod reveal;
pub mod schedule;
pub mod scroll;
pub mod typing;

use config::SiteConfig;
use cosmos::CosmosAnimation;
use delegate::ClickRouter;
use download::CvDownloadGuard;
use drawer::NavDrawer;
use reveal::RevealOnIntersect;
use scroll::{ScrollToTopButton, SmoothScrollRouter};
use typing::TypingAnimator;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Every running component. Dropping it detaches all listeners, observers,
/// timers and the animation loop.
pub struct Site {
    pub drawer: Option<NavDrawer>,
    pub typing: Option<TypingAnimator>,
    pub reveal: Option<RevealOnIntersect>,
    pub download: Option<CvDownloadGuard>,
    pub to_top: Option<ScrollToTopButton>,
    pub cosmos: Option<CosmosAnimation>,
    _scroll: SmoothScrollRouter,
    router: ClickRouter,
}

/// Logs a failed component and carries on without it.
fn mount<T>(name: &str, attached: Result<Option<T>, JsValue>) -> Option<T> {
    attached.unwrap_or_else(|err| {
        dom::report(&format!("{name} failed to start:"), &err);
        None
    })
}

impl Site {
    pub fn attach(document: &Document, config: &SiteConfig) -> Result<Self, JsValue> {
        let router = ClickRouter::attach(document)?;
        // drawer links must be routed before the generic smooth-scroll rule
        let drawer = mount("nav drawer", NavDrawer::attach(document, &config.drawer, &config.scroll, &router));
        let scroll = SmoothScrollRouter::install(&router, document, &config.scroll);

        Ok(Self {
            drawer,
            typing: mount("typing", TypingAnimator::attach(document, &config.typing)),
            reveal: mount("reveal", RevealOnIntersect::attach(document, &config.reveal)),
            download: mount("cv download", CvDownloadGuard::attach(document, &config.download)),
            to_top: mount("scroll to top", ScrollToTopButton::attach(document, &config.to_top)),
            cosmos: mount("cosmos", CosmosAnimation::attach(document, &config.cosmos)),
            _scroll: scroll,
            router,
        })
    }

    pub fn click_rules(&self) -> usize {
        self.router.rule_count()
    }

    fn summary(&self) -> String {
        let on = |b: bool| if b { "on" } else { "off" };
        format!(
            "cosmos-folio: drawer {}, typing {}, reveal {}, cv {}, to-top {}, cosmos {}, {} click rules",
            on(self.drawer.is_some()),
            on(self.typing.is_some()),
            on(self.reveal.is_some()),
            on(self.download.is_some()),
            on(self.to_top.is_some()),
            on(self.cosmos.is_some()),
            self.click_rules(),
        )
    }
}

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

fn install(config: SiteConfig) -> Result<(), JsValue> {
    // tear down a previous run before wiring the page again
    dispose();
    let document = dom::document()?;
    let site = Site::attach(&document, &config)?;
    web_sys::console::log_1(&site.summary().into());
    SITE.with(|s| *s.borrow_mut() = Some(site));
    Ok(())
}

/// Starts every component, reading overrides from the embedded config block.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let document = dom::document()?;
    install(SiteConfig::from_document(&document))
}

/// Starts every component with the given JSON config.
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    install(SiteConfig::from_json(json)?)
}

/// Detaches everything `start` installed. Safe to call when nothing runs.
#[wasm_bindgen]
pub fn dispose() {
    let old = SITE.with(|s| s.borrow_mut().take());
    drop(old);
}

#[wasm_bindgen]
pub fn is_running() -> bool {
    SITE.with(|s| s.borrow().is_some())
}
