use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::domain::ProductId;
use crate::domain::inventory::{InventoryRow, StockStatus, filter_rows};
use crate::domain::response::{ProductStock, StockUpdated};
use crate::services::{
    BusyControl, BusyGuard, InputValidator, LogHelper, Services, StorefrontError, UserErrorFormatter,
};

/// Inventory table elements the controller writes to.
pub trait InventoryView {
    fn show_stock(&self, product: &ProductId, stock: u32, status: StockStatus);
    fn set_row_visible(&self, product: &ProductId, visible: bool);
    /// Submit control of the product's stock form.
    fn submit_control(&self, product: &ProductId) -> Option<Rc<dyn BusyControl>>;
}

pub struct InventoryController<V: InventoryView> {
    services: Services,
    view: V,
    rows: RefCell<Vec<InventoryRow>>,
}

impl<V: InventoryView> InventoryController<V> {
    pub fn new(services: Services, view: V, rows: Vec<InventoryRow>) -> Self {
        let low = rows
            .iter()
            .filter(|row| row.status == StockStatus::LowStock)
            .count();
        if low > 0 {
            warn!(count = low, "Items are low in stock");
        }

        Self {
            services,
            view,
            rows: RefCell::new(rows),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn rows(&self) -> Vec<InventoryRow> {
        self.rows.borrow().clone()
    }

    /// Save a new stock level typed into a product's form. The row only
    /// changes once the server confirms.
    pub async fn handle_stock_update(&self, product_id: &ProductId, raw_input: &str) -> Result<ProductStock, StorefrontError> {
        let stock = match InputValidator::validate_stock(raw_input) {
            Ok(stock) => stock,
            Err(err) => {
                self.services
                    .notifier
                    .error("Please enter a valid stock quantity");
                return Err(err);
            }
        };

        let result = {
            let label = self.services.config.labels.saving.clone();
            let _busy = self
                .view
                .submit_control(product_id)
                .map(|control| BusyGuard::acquire(control, Some(&label)));
            self.services
                .api
                .post::<StockUpdated>(
                    &self.services.config.endpoints.update_stock(product_id),
                    Some(json!({ "stock": stock })),
                )
                .await
        };
        LogHelper::log_request_outcome("update_stock", product_id.as_str(), result.as_ref().map(|_| ()));

        match result {
            Ok(StockUpdated { product }) => {
                self.apply_stock(&product);
                self.services.notifier.success("Stock updated successfully");
                Ok(product)
            }
            Err(err) => {
                self.services
                    .notifier
                    .error(UserErrorFormatter::message_for(&err, "Error updating stock"));
                Err(err)
            }
        }
    }

    /// Show rows whose name contains `search_term` (any case) and whose
    /// status matches `status_filter` (`""`, `"in"`, `"low"`, `"out"`).
    /// Returns the number of visible rows.
    pub fn filter_products(&self, search_term: &str, status_filter: &str) -> usize {
        let visibility = filter_rows(&self.rows.borrow(), search_term, status_filter);

        let mut shown = 0;
        for (id, visible) in &visibility {
            self.view.set_row_visible(id, *visible);
            shown += usize::from(*visible);
        }
        debug!(search = %search_term, status = %status_filter, shown, "Inventory filtered");
        shown
    }

    fn apply_stock(&self, product: &ProductStock) {
        let status = StockStatus::for_stock(product.stock, self.services.config.low_stock_threshold);

        let mut rows = self.rows.borrow_mut();
        match rows.iter_mut().find(|row| row.id == product.id) {
            Some(row) => {
                row.stock = product.stock;
                row.status = status;
            }
            None => {
                warn!(product = %product.id, "Stock update for a product without a row");
                return;
            }
        }
        drop(rows);

        self.view.show_stock(&product.id, product.stock, status);
    }
}
