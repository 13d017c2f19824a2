use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement};

use super::dom::{self, ElementControl};
use crate::controllers::{InventoryController, InventoryView};
use crate::domain::inventory::{InventoryRow, StockStatus};
use crate::domain::{ActionKind, ProductId};
use crate::services::{BusyControl, InputValidator, Services, StorefrontError};

/// The cells of one inventory row the view writes back to.
pub struct RowElements {
    row: HtmlElement,
    stock_cell: Option<Element>,
    status_cell: Option<Element>,
}

pub struct WebInventoryView {
    document: Document,
    rows: HashMap<ProductId, RowElements>,
    submit_controls: HashMap<ProductId, Element>,
}

impl WebInventoryView {
    fn render_badge(&self, cell: &Element, status: StockStatus) {
        let badge = match self.document.create_element("span") {
            Ok(badge) => badge,
            Err(err) => {
                warn!(error = ?err, "Could not create status badge");
                return;
            }
        };
        badge.set_class_name(&format!("badge {}", status.badge_class()));
        badge.set_text_content(Some(status.label()));

        cell.set_text_content(None);
        if let Err(err) = cell.append_child(&badge) {
            warn!(error = ?err, "Could not attach status badge");
        }
    }
}

impl InventoryView for WebInventoryView {
    fn show_stock(&self, product: &ProductId, stock: u32, status: StockStatus) {
        let Some(elements) = self.rows.get(product) else {
            return;
        };
        if let Some(cell) = &elements.stock_cell {
            cell.set_text_content(Some(&stock.to_string()));
        }
        if let Some(cell) = &elements.status_cell {
            self.render_badge(cell, status);
        }
    }

    fn set_row_visible(&self, product: &ProductId, visible: bool) {
        if let Some(elements) = self.rows.get(product) {
            let display = if visible { "" } else { "none" };
            if let Err(err) = elements.row.style().set_property("display", display) {
                warn!(error = ?err, product = %product, "Could not toggle row");
            }
        }
    }

    fn submit_control(&self, product: &ProductId) -> Option<Rc<dyn BusyControl>> {
        self.submit_controls
            .get(product)
            .map(|button| Rc::new(ElementControl(button.clone())) as Rc<dyn BusyControl>)
    }
}

fn product_id(element: &Element) -> Option<ProductId> {
    element
        .get_attribute("data-product-id")
        .map(ProductId::new)
        .filter(|id| !id.as_str().is_empty())
}

/// Read a row's state, trusting the rendered badge over the stock number.
pub fn read_row(element: Element, low_stock_threshold: u32) -> Option<(InventoryRow, RowElements)> {
    let id = product_id(&element)?;
    let name = dom::text_of(&element, ".product-name")?.trim().to_string();
    let stock_cell = dom::query_in(&element, ".stock-quantity");
    let status_cell = dom::query_in(&element, ".stock-status");

    let stock = stock_cell
        .as_ref()
        .and_then(|cell| cell.text_content())
        .and_then(|text| InputValidator::parse_integer(&text))
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0);
    let status = dom::text_of(&element, ".stock-status .badge")
        .and_then(|text| StockStatus::from_label(&text))
        .unwrap_or_else(|| StockStatus::for_stock(stock, low_stock_threshold));

    let row = element.dyn_into::<HtmlElement>().ok()?;
    Some((
        InventoryRow { id, name, stock, status },
        RowElements {
            row,
            stock_cell,
            status_cell,
        },
    ))
}

/// Bind the inventory page. Returns false unless the page carries stock
/// forms or the search and status filter inputs.
pub fn mount(services: Services, document: &Document) -> Result<bool, StorefrontError> {
    let forms = dom::query_all(document, &ActionKind::UpdateStock.selector());
    let search = document
        .get_element_by_id("inventorySearch")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
    let status = document
        .get_element_by_id("statusFilter")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());

    if forms.is_empty() && search.is_none() && status.is_none() {
        return Ok(false);
    }

    let threshold = services.config.low_stock_threshold;
    let mut rows = Vec::new();
    let mut row_elements = HashMap::new();
    for element in dom::query_all(document, "[data-product-id]:not(form)") {
        if let Some((row, elements)) = read_row(element, threshold) {
            row_elements.insert(row.id.clone(), elements);
            rows.push(row);
        }
    }

    let mut submit_controls = HashMap::new();
    let mut form_bindings = Vec::new();
    for form in forms {
        let Some(id) = product_id(&form) else {
            warn!("Stock form without data-product-id");
            continue;
        };
        if let Some(button) = dom::query_in(&form, "button[type=\"submit\"]") {
            submit_controls.insert(id.clone(), button);
        }
        let input = dom::query_in(&form, "input[name=\"stock\"]")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        form_bindings.push((id, form, input));
    }

    let view = WebInventoryView {
        document: document.clone(),
        rows: row_elements,
        submit_controls,
    };
    let controller = Rc::new(InventoryController::new(services, view, rows));

    for (id, form, input) in form_bindings {
        let controller = Rc::clone(&controller);
        dom::listen(&form, "submit", move |event| {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            let id = id.clone();
            let raw = input.as_ref().map(|i| i.value()).unwrap_or_default();
            spawn_local(async move {
                if let Err(err) = controller.handle_stock_update(&id, &raw).await {
                    debug!(product = %id, error = %err, "Stock not updated");
                }
            });
        })?;
    }

    let refilter = {
        let controller = Rc::clone(&controller);
        let search = search.clone();
        let status = status.clone();
        move |_: Event| {
            let term = search.as_ref().map(|s| s.value()).unwrap_or_default();
            let filter = status.as_ref().map(|s| s.value()).unwrap_or_default();
            controller.filter_products(&term, &filter);
        }
    };

    if let Some(search) = &search {
        dom::listen(search, "input", refilter.clone())?;
    }
    if let Some(status) = &status {
        dom::listen(status, "change", refilter)?;
    }

    Ok(true)
}
