use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::domain::{CartLineId, ProductId};

/// Element the server may render to override defaults:
/// `<script type="application/json" id="storefront-config">{...}</script>`
pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Origin requests are resolved against. Defaults to the page origin.
    pub base_url: Option<String>,

    pub csrf_cookie_name: String,
    pub csrf_header_name: String,

    pub endpoints: Endpoints,

    /// Added client-side to the server subtotal
    pub delivery_fee: f64,
    pub currency_symbol: String,

    pub low_stock_threshold: u32,

    pub notification_timeout_ms: u64,

    /// Delay between consecutive cards of the landing entrance animation
    pub entrance_step_ms: u64,

    /// Restore native form submit buttons after this long even if the page
    /// never navigates away (download responses). `null` disables it.
    pub form_submit_fallback_ms: Option<u64>,

    pub labels: BusyLabels,

    /// One of trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            endpoints: Endpoints::default(),
            delivery_fee: 50.0,
            currency_symbol: "₱".to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            notification_timeout_ms: 3000,
            entrance_step_ms: 100,
            form_submit_fallback_ms: Some(10_000),
            labels: BusyLabels::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Path templates; `{id}` is replaced with the line or product id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub update_cart: String,
    pub clear_cart: String,
    pub update_stock: String,
    pub add_to_cart: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            update_cart: "/update-cart/{id}/".to_string(),
            clear_cart: "/clear-cart/".to_string(),
            update_stock: "/update-stock/{id}/".to_string(),
            add_to_cart: "/add-to-cart/{id}/".to_string(),
        }
    }
}

impl Endpoints {
    pub fn update_cart(&self, line: &CartLineId) -> String {
        self.update_cart.replace(ID_PLACEHOLDER, line.as_str())
    }

    pub fn update_stock(&self, product: &ProductId) -> String {
        self.update_stock.replace(ID_PLACEHOLDER, product.as_str())
    }

    pub fn add_to_cart(&self, product: &ProductId) -> String {
        self.add_to_cart.replace(ID_PLACEHOLDER, product.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BusyLabels {
    pub adding: String,
    pub processing: String,
    pub saving: String,
}

impl Default for BusyLabels {
    fn default() -> Self {
        Self {
            adding: "Adding...".to_string(),
            processing: "Processing...".to_string(),
            saving: "Saving...".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Parse a JSON override; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid storefront config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.form_submit_fallback_ms == Some(0) {
            bail!("form_submit_fallback_ms must be greater than zero or null");
        }

        if self.notification_timeout_ms == 0 {
            bail!("notification_timeout_ms must be greater than zero");
        }

        if !self.delivery_fee.is_finite() || self.delivery_fee < 0.0 {
            bail!("delivery_fee must be a non-negative number");
        }

        for (name, template) in [
            ("update_cart", &self.endpoints.update_cart),
            ("update_stock", &self.endpoints.update_stock),
            ("add_to_cart", &self.endpoints.add_to_cart),
        ] {
            if !template.contains(ID_PLACEHOLDER) {
                bail!("endpoint {name} must contain {ID_PLACEHOLDER}: {template}");
            }
        }

        if self.csrf_cookie_name.trim().is_empty() || self.csrf_header_name.trim().is_empty() {
            bail!("CSRF cookie and header names cannot be empty");
        }

        Ok(())
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    pub fn entrance_step(&self) -> Duration {
        Duration::from_millis(self.entrance_step_ms)
    }

    pub fn form_submit_fallback(&self) -> Option<Duration> {
        self.form_submit_fallback_ms.map(Duration::from_millis)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
