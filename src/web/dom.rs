use std::time::Duration;
use tracing::{error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlDocument, NodeList, Window};

use crate::services::{BusyControl, CookieSource, Scheduler, StorefrontError};

const SPINNER: &str = r#"<span class="spinner-border spinner-border-sm"></span> "#;

pub fn window() -> Result<Window, StorefrontError> {
    web_sys::window().ok_or_else(|| StorefrontError::MissingElement("window".into()))
}

pub fn document() -> Result<Document, StorefrontError> {
    window()?
        .document()
        .ok_or_else(|| StorefrontError::MissingElement("document".into()))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => elements(list),
        Err(err) => {
            warn!(selector, error = ?err, "Selector rejected");
            Vec::new()
        }
    }
}

pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn text_of(root: &Element, selector: &str) -> Option<String> {
    query_in(root, selector).and_then(|el| el.text_content())
}

/// Attach a listener for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), StorefrontError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|err| StorefrontError::MissingElement(format!("{event} listener: {err:?}")))?;
    closure.forget();
    Ok(())
}

/// Any element used as a busy-able control (button, input, link).
pub struct ElementControl(pub Element);

impl BusyControl for ElementControl {
    fn label(&self) -> String {
        self.0.inner_html()
    }

    fn set_label(&self, label: &str) {
        self.0.set_inner_html(label);
    }

    fn set_busy_label(&self, label: &str) {
        self.0.set_inner_html(SPINNER);
        if let Err(err) = self.0.append_with_str_1(label) {
            warn!(error = ?err, "Could not write busy label");
        }
    }

    fn set_disabled(&self, disabled: bool) {
        let result = if disabled {
            self.0.set_attribute("disabled", "")
        } else {
            self.0.remove_attribute("disabled")
        };
        if let Err(err) = result {
            warn!(error = ?err, "Could not toggle disabled");
        }
    }
}

/// `document.cookie`
pub struct DocumentCookies(HtmlDocument);

impl DocumentCookies {
    pub fn new(document: &Document) -> Result<Self, StorefrontError> {
        document
            .clone()
            .dyn_into::<HtmlDocument>()
            .map(Self)
            .map_err(|_| StorefrontError::MissingElement("HTML document".into()))
    }
}

impl CookieSource for DocumentCookies {
    fn raw_cookies(&self) -> Option<String> {
        self.0.cookie().ok()
    }
}

/// `window.setTimeout`
pub struct TimeoutScheduler(Window);

impl TimeoutScheduler {
    pub fn new(window: Window) -> Self {
        Self(window)
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        if let Err(err) = self
            .0
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            error!(error = ?err, delay_ms = millis, "setTimeout failed");
        }
    }
}
