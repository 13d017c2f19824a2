//! Browser-side behavior for the storefront pages: cart editing, inventory
//! stock management, add-to-cart, and landing page effects.
//!
//! Controllers in [`controllers`] are written against small view traits so
//! they run natively under test; [`web`] binds them to the DOM.

pub mod config;
pub mod controllers;
pub mod domain;
pub mod services;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Make test_helpers available for integration tests
pub mod test_helpers;
