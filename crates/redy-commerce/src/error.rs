//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in marketplace domain operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Cart has no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid checkout stage transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidStageTransition { from: String, to: String },

    /// Invalid order status transition.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Invalid approval transition.
    #[error("Invalid approval transition from {from} to {to}")]
    InvalidApprovalTransition { from: String, to: String },

    /// Rejection requires a reason.
    #[error("Rejection reason must not be empty")]
    EmptyRejectionReason,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Device storage error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
