pub mod action;
pub mod cart;
pub mod effects;
pub mod ids;
pub mod inventory;
pub mod notification;
pub mod response;

pub use action::ActionKind;
pub use ids::{CartLineId, ProductId};
