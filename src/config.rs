//! Page configuration.
//!
//! Every value defaults to what the portfolio page ships with, so an empty JSON
//! object (or no config at all) yields the stock behaviour. A page can override
//! any subset by embedding `<script type="application/json" id="site-config">`
//! or by calling `start_with_config` with JSON text.

use serde::Deserialize;
use wasm_bindgen::JsValue;
use web_sys::Document;

/// Id of the optional embedded JSON config element.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub typing: TypingConfig,
    pub scroll: ScrollConfig,
    pub drawer: DrawerConfig,
    pub reveal: RevealConfig,
    pub download: DownloadConfig,
    pub to_top: ToTopConfig,
    pub cosmos: CosmosConfig,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, JsValue> {
        serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid site config: {e}")))
    }

    /// Reads the embedded config element if present. A malformed block is
    /// reported on the console and the defaults are used instead.
    pub fn from_document(document: &Document) -> Self {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        if text.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                web_sys::console::warn_2(&"falling back to default config:".into(), &err);
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypingConfig {
    pub element_id: String,
    pub phrases: Vec<String>,
    pub type_delay_ms: f64,
    pub delete_delay_ms: f64,
    pub pause_ms: f64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            element_id: "typing".into(),
            phrases: vec![
                "software engineer".into(),
                "problem solver".into(),
                "tech enthusiasts".into(),
            ],
            type_delay_ms: 100.0,
            delete_delay_ms: 50.0,
            pause_ms: 1500.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Attribute whose value is a CSS selector naming the scroll target.
    pub target_attribute: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { target_attribute: "data-scroll".into() }
    }
}

impl ScrollConfig {
    /// Selector matching links that carry a scroll target.
    pub fn link_selector(&self) -> String {
        format!("a[{}]", self.target_attribute)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawerConfig {
    pub toggle_selector: String,
    pub drawer_id: String,
    pub overlay_selector: String,
    pub close_selector: String,
    /// Viewport width (px) above which the drawer is force-closed.
    pub breakpoint_px: u32,
    /// Delay between closing the drawer and following the clicked link.
    pub navigate_delay_ms: f64,
    pub open_class: String,
    pub overlay_class: String,
    pub open_label: String,
    pub close_label: String,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".into(),
            drawer_id: "primary-nav".into(),
            overlay_selector: ".nav-overlay".into(),
            close_selector: ".drawer-close".into(),
            breakpoint_px: 900,
            navigate_delay_ms: 50.0,
            open_class: "is-open".into(),
            overlay_class: "is-visible".into(),
            open_label: "Open menu".into(),
            close_label: "Close menu".into(),
        }
    }
}

impl DrawerConfig {
    pub fn desktop_query(&self) -> String {
        format!("(min-width: {}px)", self.breakpoint_px)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".top, .experience-section, .my-profiles, .my-tech-stack, .my-clients".into(),
            threshold: 0.3,
            class: "animate".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadConfig {
    pub control_selector: String,
    pub default_href: String,
    pub default_filename: String,
    pub confirm_message: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            control_selector: "[data-download=\"cv\"]".into(),
            default_href: "./assets/CV.pdf".into(),
            default_filename: "CV.pdf".into(),
            confirm_message: "Appreciate your interest for downloading my CV! \nAre you sure that you want to download it?".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToTopConfig {
    pub element_id: String,
    pub threshold_px: f64,
    pub class: String,
}

impl Default for ToTopConfig {
    fn default() -> Self {
        Self { element_id: "scrollToTop".into(), threshold_px: 250.0, class: "show".into() }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CosmosConfig {
    pub canvas_id: String,
    pub orb_count: usize,
    pub reduced_orb_count: usize,
    pub first_comet_delay_ms: f64,
    pub comet_interval_min_ms: f64,
    pub comet_interval_max_ms: f64,
    pub double_comet_chance: f64,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            canvas_id: "cosmos".into(),
            orb_count: 50,
            reduced_orb_count: 20,
            first_comet_delay_ms: 1500.0,
            comet_interval_min_ms: 4000.0,
            comet_interval_max_ms: 10000.0,
            double_comet_chance: 0.2,
        }
    }
}
