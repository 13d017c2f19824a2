use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{info, warn};

use crate::domain::CartLineId;
use crate::domain::cart::{CartLine, CartSummary, format_price};
use crate::domain::response::{Acknowledged, CartTotals};
use crate::services::{
    BusyControl, BusyGuard, InputValidator, LogHelper, Services, StorefrontError, UserErrorFormatter,
};

/// Cart page elements the controller writes to.
pub trait CartView {
    /// Ask the shopper to confirm a destructive action.
    fn confirm(&self, message: &str) -> bool;
    fn show_quantity(&self, line: &CartLineId, quantity: u32);
    /// The quantity input of a line, disabled while its update is in flight.
    fn quantity_control(&self, line: &CartLineId) -> Option<Rc<dyn BusyControl>>;
    fn remove_line(&self, line: &CartLineId);
    fn show_totals(&self, subtotal: &str, total: &str);
    /// Every cart-count badge on the page.
    fn show_cart_count(&self, count: u32);
    fn reload(&self);
}

pub struct CartController<V: CartView> {
    services: Services,
    view: V,
    /// Lines still on the page; a removed line leaves the map
    lines: RefCell<HashMap<CartLineId, CartLine>>,
}

impl<V: CartView> CartController<V> {
    pub fn new(services: Services, view: V, lines: Vec<CartLine>) -> Self {
        let lines = lines.into_iter().map(|line| (line.id.clone(), line)).collect();
        Self {
            services,
            view,
            lines: RefCell::new(lines),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn line(&self, id: &CartLineId) -> Option<CartLine> {
        self.lines.borrow().get(id).cloned()
    }

    /// Push a quantity change for one line. Out-of-range or non-numeric
    /// input is rejected without a request; any failure puts the input back
    /// to the last quantity the server accepted.
    pub async fn update_quantity(&self, line_id: &CartLineId, raw_quantity: &str) -> Result<CartSummary, StorefrontError> {
        let Some((previous, max_stock)) = self
            .lines
            .borrow()
            .get(line_id)
            .map(|line| (line.acknowledged(), line.max_stock))
        else {
            warn!(line = %line_id, "Quantity change for a line that is not on this page");
            return Err(StorefrontError::MissingElement(format!("cart line {line_id}")));
        };

        let quantity = match InputValidator::validate_quantity(raw_quantity, max_stock) {
            Ok(quantity) => quantity,
            Err(err) => {
                self.services.notifier.error("Invalid quantity");
                self.view.show_quantity(line_id, previous);
                return Err(err);
            }
        };

        let result = {
            let _busy = self.view.quantity_control(line_id).map(BusyGuard::disable);
            self.services
                .api
                .post::<CartTotals>(
                    &self.services.config.endpoints.update_cart(line_id),
                    Some(json!({ "quantity": quantity, "action": "update" })),
                )
                .await
        };
        LogHelper::log_request_outcome("update_quantity", line_id.as_str(), result.as_ref().map(|_| ()));

        match result {
            Ok(totals) => {
                if let Some(line) = self.lines.borrow().get(line_id) {
                    line.acknowledge(quantity);
                }
                let summary = self.render_summary(&totals);
                self.services.notifier.success("Cart updated successfully");
                Ok(summary)
            }
            Err(err) => {
                self.services
                    .notifier
                    .error(UserErrorFormatter::message_for(&err, "Error updating cart"));
                self.view.show_quantity(line_id, previous);
                Err(err)
            }
        }
    }

    /// Remove a line after confirmation. `Ok(None)` when the shopper
    /// cancels; the page is left alone on failure.
    pub async fn remove_item(&self, line_id: &CartLineId) -> Result<Option<CartSummary>, StorefrontError> {
        if !self.view.confirm("Remove this item from cart?") {
            return Ok(None);
        }

        let result = self
            .services
            .api
            .post::<CartTotals>(
                &self.services.config.endpoints.update_cart(line_id),
                Some(json!({ "action": "remove" })),
            )
            .await;
        LogHelper::log_request_outcome("remove_item", line_id.as_str(), result.as_ref().map(|_| ()));

        match result {
            Ok(totals) => {
                self.lines.borrow_mut().remove(line_id);
                self.view.remove_line(line_id);
                let summary = self.render_summary(&totals);
                self.services.notifier.success("Item removed from cart");
                Ok(Some(summary))
            }
            Err(err) => {
                self.services
                    .notifier
                    .error(UserErrorFormatter::message_for(&err, "Error removing item"));
                Err(err)
            }
        }
    }

    /// Empty the cart after confirmation and reload to show it empty.
    /// Returns whether the cart was cleared.
    pub async fn clear_cart(&self) -> Result<bool, StorefrontError> {
        if !self.view.confirm("Clear all items from cart?") {
            return Ok(false);
        }

        let result = self
            .services
            .api
            .post::<Acknowledged>(&self.services.config.endpoints.clear_cart, None)
            .await;
        LogHelper::log_request_outcome("clear_cart", "cart", result.as_ref().map(|_| ()));

        match result {
            Ok(_) => {
                info!("Cart cleared, reloading page");
                self.view.reload();
                Ok(true)
            }
            Err(err) => {
                self.services
                    .notifier
                    .error(UserErrorFormatter::message_for(&err, "Error clearing cart"));
                Err(err)
            }
        }
    }

    fn render_summary(&self, totals: &CartTotals) -> CartSummary {
        let config = &self.services.config;
        let summary = CartSummary::from_totals(totals, config.delivery_fee);

        self.view.show_totals(
            &format_price(summary.subtotal, &config.currency_symbol),
            &format_price(summary.total, &config.currency_symbol),
        );
        self.view.show_cart_count(summary.item_count);
        summary
    }
}
