mod cart_controller;
mod inventory_controller;
mod landing_effects;
mod storefront_controller;

pub use cart_controller::{CartController, CartView};
pub use inventory_controller::{InventoryController, InventoryView};
pub use landing_effects::{EffectsView, LandingPageEffects};
pub use storefront_controller::{FormSubmission, StorefrontController, StorefrontView, SubmissionKind};
