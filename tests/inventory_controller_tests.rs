#![cfg(not(target_arch = "wasm32"))]

use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use storefront::controllers::InventoryController;
use storefront::domain::ProductId;
use storefront::domain::inventory::{InventoryRow, StockStatus};
use storefront::domain::notification::Severity;
use storefront::services::StorefrontError;
use storefront::test_helpers::{FakeInventoryView, TestContext};

#[cfg(test)]
mod inventory_controller_tests {
    use super::*;

    fn init_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Build a controller over `rows` while recording what it logs.
    fn construct_with_logs(rows: Vec<InventoryRow>) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let ctx = TestContext::new_for_test();
        tracing::subscriber::with_default(subscriber, || {
            InventoryController::new(ctx.services.clone(), FakeInventoryView::default(), rows);
        });
        logs.text()
    }

    fn row(id: &str, name: &str, stock: u32) -> InventoryRow {
        InventoryRow {
            id: ProductId::new(id),
            name: name.to_string(),
            stock,
            status: StockStatus::from(stock),
        }
    }

    fn catalog() -> Vec<InventoryRow> {
        vec![
            row("42", "Ube Halaya", 8),
            row("43", "Ube Pandesal", 30),
            row("44", "Leche Flan", 0),
            row("45", "Halo-Halo Kit", 12),
        ]
    }

    fn controller(ctx: &TestContext) -> InventoryController<FakeInventoryView> {
        init_logging();
        let view = FakeInventoryView::default().with_submit(&ProductId::new("42"), "Update");
        InventoryController::new(ctx.services.clone(), view, catalog())
    }

    #[tokio::test]
    async fn test_stock_zero_shows_out_of_stock_badge() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);
        ctx.http.respond(json!({"success": true, "product": {"id": 42, "stock": 0}}));

        let product = inventory.handle_stock_update(&ProductId::new("42"), "0").await.unwrap();

        assert_eq!(product.stock, 0);
        assert_eq!(
            inventory.view().stock.borrow().get(&ProductId::new("42")),
            Some(&(0, StockStatus::OutOfStock))
        );
        assert_eq!(StockStatus::OutOfStock.label(), "Out of Stock");
        assert_eq!(StockStatus::OutOfStock.badge_class(), "bg-danger");

        let request = &ctx.http.requests()[0];
        assert_eq!(request.path, "/update-stock/42/");
        assert_eq!(request.body, Some(json!({"stock": 0})));
        assert_eq!(
            ctx.surface.last(),
            Some((Severity::Success, "Stock updated successfully".to_string()))
        );
    }

    #[tokio::test]
    async fn test_row_state_follows_server_stock() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);
        ctx.http.respond(json!({"success": true, "product": {"id": "42", "stock": 25}}));

        inventory.handle_stock_update(&ProductId::new("42"), "25").await.unwrap();

        let updated = inventory
            .rows()
            .into_iter()
            .find(|r| r.id == ProductId::new("42"))
            .unwrap();
        assert_eq!(updated.stock, 25);
        assert_eq!(updated.status, StockStatus::InStock);
        assert_eq!(inventory.filter_products("", "in"), 3);
    }

    #[tokio::test]
    async fn test_negative_or_blank_stock_rejected_locally() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);

        for raw in ["-3", "", "lots"] {
            let result = inventory.handle_stock_update(&ProductId::new("42"), raw).await;
            assert!(matches!(result, Err(StorefrontError::Validation { .. })), "{raw:?} accepted");
        }
        assert_eq!(ctx.http.request_count(), 0);
        assert_eq!(
            ctx.surface.last(),
            Some((Severity::Error, "Please enter a valid stock quantity".to_string()))
        );
        assert!(inventory.view().stock.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_submit_control_saving_then_restored() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);
        ctx.http.fail(StorefrontError::Transport("timeout".into()));

        assert!(inventory.handle_stock_update(&ProductId::new("42"), "5").await.is_err());

        let submit = inventory.view().submit(&ProductId::new("42")).unwrap();
        assert_eq!(submit.disabled_history(), vec![true, false]);
        assert_eq!(submit.current_label(), "Update");
        assert_eq!(ctx.surface.last(), Some((Severity::Error, "Error updating stock".to_string())));
        assert!(inventory.view().stock.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_server_decline_message_shown() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);
        ctx.http.respond(json!({"success": false, "error": "Product archived"}));

        assert!(inventory.handle_stock_update(&ProductId::new("44"), "3").await.is_err());
        assert_eq!(ctx.surface.last(), Some((Severity::Error, "Product archived".to_string())));
    }

    #[test]
    fn test_low_stock_rows_logged_at_construction() {
        let output = construct_with_logs(catalog());

        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Items are low in stock"), "{output}");
        assert!(output.contains("count=1"), "{output}");
    }

    #[test]
    fn test_well_stocked_catalog_logs_no_warning() {
        let output = construct_with_logs(vec![row("43", "Ube Pandesal", 30), row("44", "Leche Flan", 0)]);

        assert!(!output.contains("Items are low in stock"), "{output}");
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);

        assert_eq!(inventory.filter_products("UBE", ""), 2);
        let view = inventory.view();
        assert_eq!(view.visible(&ProductId::new("42")), Some(true));
        assert_eq!(view.visible(&ProductId::new("43")), Some(true));
        assert_eq!(view.visible(&ProductId::new("44")), Some(false));
        assert_eq!(view.visible(&ProductId::new("45")), Some(false));
    }

    #[test]
    fn test_filter_combines_term_and_status() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);

        assert_eq!(inventory.filter_products("ube", "low"), 1);
        assert_eq!(inventory.view().visible(&ProductId::new("42")), Some(true));
        assert_eq!(inventory.filter_products("", "out"), 1);
        assert_eq!(inventory.view().visible(&ProductId::new("44")), Some(true));
        assert_eq!(inventory.filter_products("", ""), 4);
    }

    #[test]
    fn test_unknown_status_hides_everything() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);

        assert_eq!(inventory.filter_products("", "discontinued"), 0);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ctx = TestContext::new_for_test();
        let inventory = controller(&ctx);

        inventory.filter_products("halo", "in");
        let first = inventory.view().visibility.borrow().clone();
        inventory.filter_products("halo", "in");
        let second = inventory.view().visibility.borrow().clone();

        assert_eq!(first, second);
        assert_eq!(inventory.view().visibility_writes.get(), 8);
    }
}
