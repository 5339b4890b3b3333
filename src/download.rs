//! Confirm-before-download for the CV link.
//!
//! The control's own navigation is suppressed. After the visitor accepts the
//! confirmation, a hidden anchor carrying the resolved `href` / `download`
//! pair is appended, clicked and removed again, so the browser's native
//! download handling does the rest.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlAnchorElement};

use crate::config::DownloadConfig;
use crate::dom::{self, Listener};

/// Blocking yes/no question to the visitor.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// `window.confirm`. Any failure counts as "no".
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    pub href: String,
    pub filename: String,
}

impl DownloadRequest {
    /// Missing or empty attributes fall back to the configured defaults.
    pub fn resolve(href: Option<String>, download: Option<String>, config: &DownloadConfig) -> Self {
        let pick = |v: Option<String>, default: &str| {
            v.filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
        };
        Self {
            href: pick(href, &config.default_href),
            filename: pick(download, &config.default_filename),
        }
    }

    pub fn from_control(control: &Element, config: &DownloadConfig) -> Self {
        Self::resolve(control.get_attribute("href"), control.get_attribute("download"), config)
    }
}

/// Asks first; `None` when the visitor declines.
pub fn confirm_download(
    confirm: &dyn Confirm,
    message: &str,
    request: DownloadRequest,
) -> Option<DownloadRequest> {
    confirm.confirm(message).then_some(request)
}

/// Hands the request to the browser through a transient hidden anchor.
pub fn trigger(document: &Document, request: &DownloadRequest) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&request.href);
    anchor.set_attribute("download", &request.filename)?;
    anchor.style().set_property("display", "none")?;
    dom::body(document)?.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

pub struct CvDownloadGuard {
    _listener: Listener,
}

impl CvDownloadGuard {
    pub fn attach(document: &Document, config: &DownloadConfig) -> Result<Option<Self>, JsValue> {
        Self::attach_with(document, config, BrowserConfirm)
    }

    /// As [`attach`](Self::attach) with a custom confirmation source.
    pub fn attach_with<C: Confirm + 'static>(
        document: &Document,
        config: &DownloadConfig,
        confirm: C,
    ) -> Result<Option<Self>, JsValue> {
        let Some(control) = document.query_selector(&config.control_selector)? else {
            return Ok(None);
        };
        let doc = document.clone();
        let cfg = config.clone();
        let target = control.clone();
        let listener = Listener::new(&control, "click", move |event: Event| {
            event.prevent_default();
            // fully handled here; keep delegated link rules out of it
            event.stop_propagation();
            let request = DownloadRequest::from_control(&target, &cfg);
            if let Some(request) = confirm_download(&confirm, &cfg.confirm_message, request) {
                if let Err(err) = trigger(&doc, &request) {
                    dom::report("cv download:", &err);
                }
            }
        })?;
        Ok(Some(Self { _listener: listener }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn attributes_win_over_defaults() {
        let cfg = DownloadConfig::default();
        let req = DownloadRequest::resolve(Some("/files/me.pdf".into()), Some("Me.pdf".into()), &cfg);
        assert_eq!(req, DownloadRequest { href: "/files/me.pdf".into(), filename: "Me.pdf".into() });
    }

    #[test]
    fn missing_or_empty_attributes_fall_back() {
        let cfg = DownloadConfig::default();
        let req = DownloadRequest::resolve(None, Some(String::new()), &cfg);
        assert_eq!(req.href, "./assets/CV.pdf");
        assert_eq!(req.filename, "CV.pdf");
    }

    #[test]
    fn declining_yields_nothing() {
        let asked = Cell::new(0);
        let no = |msg: &str| {
            asked.set(asked.get() + 1);
            assert!(msg.contains("CV"));
            false
        };
        let cfg = DownloadConfig::default();
        let req = DownloadRequest::resolve(None, None, &cfg);
        assert_eq!(confirm_download(&no, &cfg.confirm_message, req), None);
        assert_eq!(asked.get(), 1);
    }

    #[test]
    fn accepting_passes_request_through() {
        let cfg = DownloadConfig::default();
        let req = DownloadRequest::resolve(Some("a.pdf".into()), None, &cfg);
        let got = confirm_download(&|_: &str| true, &cfg.confirm_message, req.clone());
        assert_eq!(got, Some(req));
    }
}
