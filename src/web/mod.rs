//! Browser bindings: real DOM elements behind the controller view traits.
//!
//! Compiled for `wasm32` only. Every page loads the same module; each
//! controller mounts only when its anchors are present.

mod cart_page;
pub mod dom;
pub mod inventory_page;
mod landing_page;
pub mod notifications;
pub mod storefront_page;

use anyhow::{Context, Result, anyhow};
use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::{CONFIG_ELEMENT_ID, StorefrontConfig};
use crate::services::{ApiClient, Notifier, ReqwestClient, Scheduler, Services};
use dom::{DocumentCookies, TimeoutScheduler};
use notifications::{SurfaceStyle, WebNotificationSurface};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = dom::document().map_err(|e| JsValue::from_str(&e.to_string()))?;

    if document.ready_state() == "loading" {
        dom::listen(&document, "DOMContentLoaded", |_| boot())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    } else {
        boot();
    }
    Ok(())
}

fn boot() {
    let config = dom::document()
        .map_err(anyhow::Error::from)
        .and_then(|document| load_config(&document));

    let level = config.as_ref().map(StorefrontConfig::log_level).unwrap_or(log::Level::Info);
    wasm_logger::init(wasm_logger::Config::new(level));

    let config = config.unwrap_or_else(|err| {
        error!(error = ?err, "Falling back to default storefront config");
        StorefrontConfig::default()
    });

    if let Err(err) = mount_all(config) {
        error!(error = ?err, "Storefront controllers failed to start");
    }
}

fn load_config(document: &Document) -> Result<StorefrontConfig> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID) {
        Some(element) => StorefrontConfig::from_json(&element.text_content().unwrap_or_default())
            .with_context(|| format!("Reading #{CONFIG_ELEMENT_ID}")),
        None => Ok(StorefrontConfig::default()),
    }
}

fn mount_all(config: StorefrontConfig) -> Result<()> {
    let window = dom::window()?;
    let document = dom::document()?;

    let base_url = match &config.base_url {
        Some(url) => url.clone(),
        None => window
            .location()
            .origin()
            .map_err(|e| anyhow!("Page origin unavailable: {e:?}"))?,
    };

    let http = Rc::new(ReqwestClient::new(&base_url, config.csrf_header_name.clone())?);
    let cookies = Rc::new(DocumentCookies::new(&document)?);
    let api = Rc::new(ApiClient::new(http, cookies, config.csrf_cookie_name.clone()));
    let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler::new(window.clone()));
    let config = Rc::new(config);

    let notifier = |style| {
        let surface = Rc::new(WebNotificationSurface::new(document.clone(), style));
        Rc::new(Notifier::new(surface, Rc::clone(&scheduler), config.notification_timeout()))
    };
    let alerts = Services::new(api, notifier(SurfaceStyle::Alert), Rc::clone(&config));
    let toasts = alerts.with_notifier(notifier(SurfaceStyle::Toast));

    storefront_page::mount(toasts, Rc::clone(&scheduler), &document, &window).context("Mounting storefront behavior")?;

    if cart_page::mount(alerts.clone(), &document, &window).context("Mounting cart page")? {
        info!("Cart controller mounted");
    }
    if inventory_page::mount(alerts, &document).context("Mounting inventory page")? {
        info!("Inventory controller mounted");
    }
    if landing_page::mount(Rc::clone(&scheduler), config.entrance_step(), &document)
        .context("Mounting landing effects")?
    {
        info!("Landing page effects mounted");
    }

    Ok(())
}
