use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, PageTransitionEvent, SubmitEvent, Window};

use super::dom::{self, ElementControl};
use crate::controllers::{FormSubmission, StorefrontController, StorefrontView, SubmissionKind};
use crate::domain::{ActionKind, ProductId};
use crate::services::{BusyControl, Scheduler, Services, StorefrontError};

const WIDGETS: [(&str, &str); 2] = [("tooltip", "Tooltip"), ("popover", "Popover")];

pub struct WebStorefrontView {
    document: Document,
    window: Window,
    /// Desktop and mobile navigation may each render one
    badges: Vec<Element>,
    nav_links: Vec<Element>,
    nav_menu: Option<Element>,
}

impl StorefrontView for WebStorefrontView {
    fn show_cart_count(&self, count: u32) {
        let text = count.to_string();
        for badge in &self.badges {
            badge.set_text_content(Some(&text));
        }
    }

    fn current_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn nav_link_targets(&self) -> Vec<String> {
        self.nav_links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect()
    }

    fn mark_nav_link_active(&self, index: usize) {
        if let Some(link) = self.nav_links.get(index) {
            if let Err(err) = link.class_list().add_1("active") {
                warn!(error = ?err, index, "Could not mark nav link active");
            }
        }
    }

    fn toggle_mobile_menu(&self) {
        if let Some(menu) = &self.nav_menu {
            if let Err(err) = menu.class_list().toggle("active") {
                warn!(error = ?err, "Could not toggle mobile menu");
            }
        }
    }

    fn enhance_widgets(&self) -> Result<usize, StorefrontError> {
        let bootstrap = js_sys::Reflect::get(&self.window, &JsValue::from_str("bootstrap"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .ok_or_else(|| StorefrontError::MissingElement("bootstrap bundle".into()))?;

        let mut attached = 0;
        for (toggle, constructor) in WIDGETS {
            let elements = dom::query_all(&self.document, &format!("[data-bs-toggle=\"{toggle}\"]"));
            if elements.is_empty() {
                continue;
            }

            let widget = js_sys::Reflect::get(&bootstrap, &JsValue::from_str(constructor))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
                .ok_or_else(|| StorefrontError::MissingElement(format!("bootstrap.{constructor}")))?;

            for element in elements {
                js_sys::Reflect::construct(&widget, &js_sys::Array::of1(&element))
                    .map_err(|err| StorefrontError::Configuration(format!("{constructor}: {err:?}")))?;
                attached += 1;
            }
        }
        Ok(attached)
    }
}

/// Classify a form submission once every submit listener has run.
pub fn submission_kind(form: &Element, submitter: Option<&Element>, default_prevented: bool) -> SubmissionKind {
    let target = submitter
        .and_then(|button| button.get_attribute("formtarget"))
        .or_else(|| form.get_attribute("target"));

    SubmissionKind::classify(&FormSubmission {
        role: ActionKind::from_markup(form.get_attribute("data-action").as_deref(), &form.class_name()),
        is_async: form.has_attribute("data-async"),
        target,
        default_prevented,
    })
}

/// The add-to-cart control a click landed in, with its product id.
pub fn add_to_cart_control(target: &Element) -> Option<(Element, Option<ProductId>)> {
    let control = target
        .closest(&ActionKind::AddToCart.selector())
        .ok()
        .flatten()?;
    let kind = ActionKind::from_markup(control.get_attribute("data-action").as_deref(), &control.class_name());
    if kind != Some(ActionKind::AddToCart) {
        return None;
    }

    let product_id = control.get_attribute("data-product-id").map(ProductId::new);
    Some((control, product_id))
}

/// Bind the behavior every storefront page shares.
pub fn mount(
    services: Services,
    scheduler: Rc<dyn Scheduler>,
    document: &Document,
    window: &Window,
) -> Result<(), StorefrontError> {
    let view = WebStorefrontView {
        document: document.clone(),
        window: window.clone(),
        badges: dom::query_all(document, ".cart-count"),
        nav_links: dom::query_all(document, ".nav-links a"),
        nav_menu: document.query_selector(".nav-links").ok().flatten(),
    };
    let controller = Rc::new(StorefrontController::new(services, view));
    controller.init();

    // One delegated listener for every add-to-cart control, present or future
    {
        let controller = Rc::clone(&controller);
        dom::listen(document, "click", move |event: Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some((control, product_id)) = add_to_cart_control(&target) else {
                return;
            };

            let controller = Rc::clone(&controller);
            spawn_local(async move {
                let control: Rc<dyn BusyControl> = Rc::new(ElementControl(control));
                if let Err(err) = controller.handle_add_to_cart(product_id, control).await {
                    debug!(error = %err, "Add to cart failed");
                }
            });
        })?;
    }

    for form in dom::query_all(document, "form") {
        let fallback_button = dom::query_in(&form, "button[type=\"submit\"]");
        let controller = Rc::clone(&controller);
        let scheduler = Rc::clone(&scheduler);
        dom::listen(&form.clone(), "submit", move |event: Event| {
            let submitter: Option<Element> = event
                .dyn_ref::<SubmitEvent>()
                .and_then(SubmitEvent::submitter)
                .map(Element::from);
            let control = submitter.clone().or_else(|| fallback_button.clone());

            // Other listeners may still cancel the event; decide once dispatch is over
            let controller = Rc::clone(&controller);
            let form = form.clone();
            scheduler.schedule(
                Duration::ZERO,
                Box::new(move || {
                    let kind = submission_kind(&form, submitter.as_ref(), event.default_prevented());
                    let control = control.map(|button| Rc::new(ElementControl(button)) as Rc<dyn BusyControl>);
                    controller.handle_form_submit(kind, control);
                }),
            );
        })?;
    }
    {
        let controller = Rc::clone(&controller);
        dom::listen(window, "pageshow", move |event| {
            let restored = event
                .dyn_into::<PageTransitionEvent>()
                .map(|e| e.persisted())
                .unwrap_or(false);
            if restored {
                controller.page_restored();
            }
        })?;
    }

    if let Some(button) = document.get_element_by_id("mobileMenuBtn") {
        let controller = Rc::clone(&controller);
        dom::listen(&button, "click", move |_| controller.toggle_mobile_menu())?;
    }

    Ok(())
}
