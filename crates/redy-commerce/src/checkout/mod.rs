//! Checkout form draft and stage machine.

mod draft;
mod flow;

pub use draft::{BuyerDraft, ValidationErrors};
pub use flow::CheckoutStage;
