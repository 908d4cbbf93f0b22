//! Checkout error types.

use redy_auth::AuthError;
use redy_commerce::checkout::ValidationErrors;
use redy_commerce::CommerceError;
use redy_db::StoreError;
use redy_payments::PaymentError;
use thiserror::Error;

/// Errors that can occur in the checkout and approval pipelines.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Buyer form failed validation.
    #[error("Buyer information is invalid: {0}")]
    InvalidBuyerInfo(ValidationErrors),

    /// Cart has no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart item was sold before the charge ran.
    #[error("Product no longer available: {0}")]
    ProductUnavailable(String),

    /// Order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order belongs to a different buyer.
    #[error("Order does not belong to the current user")]
    NotOrderOwner,

    /// Operation attempted in the wrong session stage.
    #[error("Operation not allowed in stage {stage}")]
    WrongStage { stage: String },

    /// Auth failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Datastore failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Gateway failure with unknown charge outcome.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Domain invariant violation.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}
