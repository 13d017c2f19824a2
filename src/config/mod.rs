mod storefront_config;

pub use storefront_config::{BusyLabels, CONFIG_ELEMENT_ID, Endpoints, StorefrontConfig};
