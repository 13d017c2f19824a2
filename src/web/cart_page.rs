use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement, Window};

use super::dom::{self, ElementControl};
use crate::controllers::{CartController, CartView};
use crate::domain::cart::CartLine;
use crate::domain::{ActionKind, CartLineId};
use crate::services::{BusyControl, InputValidator, Services, StorefrontError};

const LINE_SELECTOR: &str = ".cart-item";

pub struct WebCartView {
    window: Window,
    inputs: HashMap<CartLineId, HtmlInputElement>,
    lines: HashMap<CartLineId, Element>,
    subtotal: Option<Element>,
    total: Option<Element>,
    badges: Vec<Element>,
}

impl CartView for WebCartView {
    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn show_quantity(&self, line: &CartLineId, quantity: u32) {
        if let Some(input) = self.inputs.get(line) {
            input.set_value(&quantity.to_string());
        }
    }

    fn quantity_control(&self, line: &CartLineId) -> Option<Rc<dyn BusyControl>> {
        self.inputs
            .get(line)
            .map(|input| Rc::new(ElementControl(Element::from(input.clone()))) as Rc<dyn BusyControl>)
    }

    fn remove_line(&self, line: &CartLineId) {
        match self.lines.get(line) {
            Some(element) => element.remove(),
            None => warn!(line = %line, "No line element to remove"),
        }
    }

    fn show_totals(&self, subtotal: &str, total: &str) {
        if let Some(element) = &self.subtotal {
            element.set_text_content(Some(subtotal));
        }
        if let Some(element) = &self.total {
            element.set_text_content(Some(total));
        }
    }

    fn show_cart_count(&self, count: u32) {
        let text = count.to_string();
        for badge in &self.badges {
            badge.set_text_content(Some(&text));
        }
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            warn!(error = ?err, "Reload failed");
        }
    }
}

fn line_id(element: &Element) -> Option<CartLineId> {
    element
        .get_attribute("data-cart-item-id")
        .map(CartLineId::new)
        .filter(|id| !id.as_str().is_empty())
}

fn integer_attribute(element: &Element, name: &str) -> Option<u32> {
    element
        .get_attribute(name)
        .and_then(|value| InputValidator::parse_integer(&value))
        .and_then(|value| u32::try_from(value).ok())
}

/// Bind the cart page. Returns false when the page has no cart controls.
pub fn mount(services: Services, document: &Document, window: &Window) -> Result<bool, StorefrontError> {
    let inputs = dom::query_all(document, &ActionKind::UpdateQuantity.selector());
    let remove_buttons = dom::query_all(document, &ActionKind::RemoveItem.selector());
    let clear_button = dom::query_all(document, &ActionKind::ClearCart.selector())
        .into_iter()
        .next();

    if inputs.is_empty() && remove_buttons.is_empty() && clear_button.is_none() {
        return Ok(false);
    }

    let mut lines = Vec::new();
    let mut input_map = HashMap::new();
    let mut line_map = HashMap::new();

    for element in inputs {
        let Some(id) = line_id(&element) else {
            warn!("Quantity input without data-cart-item-id");
            continue;
        };
        let Ok(input) = element.dyn_into::<HtmlInputElement>() else {
            continue;
        };

        // No max attribute means no upper bound
        let max_stock = integer_attribute(&input, "max").unwrap_or(u32::MAX);
        let quantity = integer_attribute(&input, "data-old-value")
            .or_else(|| InputValidator::parse_integer(&input.value()).and_then(|v| u32::try_from(v).ok()))
            .unwrap_or(1);

        if let Ok(Some(line)) = input.closest(LINE_SELECTOR) {
            line_map.insert(id.clone(), line);
        }
        lines.push(CartLine::new(id.clone(), max_stock, quantity));
        input_map.insert(id, input);
    }

    let removals: Vec<(CartLineId, Element)> = remove_buttons
        .into_iter()
        .filter_map(|button| line_id(&button).map(|id| (id, button)))
        .collect();
    for (id, button) in &removals {
        if !line_map.contains_key(id) {
            if let Ok(Some(line)) = button.closest(LINE_SELECTOR) {
                line_map.insert(id.clone(), line);
            }
        }
    }

    let quantity_bindings: Vec<(CartLineId, HtmlInputElement)> =
        input_map.iter().map(|(id, input)| (id.clone(), input.clone())).collect();

    let view = WebCartView {
        window: window.clone(),
        inputs: input_map,
        lines: line_map,
        subtotal: document.query_selector(".subtotal").ok().flatten(),
        total: document.query_selector(".total-amount").ok().flatten(),
        badges: dom::query_all(document, ".cart-count"),
    };
    let controller = Rc::new(CartController::new(services, view, lines));

    for (id, input) in quantity_bindings {
        let controller = Rc::clone(&controller);
        let target = input.clone();
        dom::listen(&target, "change", move |_| {
            let controller = Rc::clone(&controller);
            let id = id.clone();
            let raw = input.value();
            spawn_local(async move {
                if let Err(err) = controller.update_quantity(&id, &raw).await {
                    debug!(line = %id, error = %err, "Quantity change not applied");
                }
            });
        })?;
    }

    for (id, button) in removals {
        let controller = Rc::clone(&controller);
        dom::listen(&button, "click", move |_| {
            let controller = Rc::clone(&controller);
            let id = id.clone();
            spawn_local(async move {
                if let Err(err) = controller.remove_item(&id).await {
                    debug!(line = %id, error = %err, "Line not removed");
                }
            });
        })?;
    }

    if let Some(button) = clear_button {
        let controller = Rc::clone(&controller);
        dom::listen(&button, "click", move |event| {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                if let Err(err) = controller.clear_cart().await {
                    debug!(error = %err, "Cart not cleared");
                }
            });
        })?;
    }

    Ok(true)
}
