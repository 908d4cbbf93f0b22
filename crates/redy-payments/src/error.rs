//! Payment error types.

use thiserror::Error;

/// Errors that can occur talking to the payment gateway.
///
/// A rejected charge is not an error: it comes back as a
/// [`Charge`](crate::gateway::Charge) with rejected status. Errors here
/// mean the charge could not be attempted or its outcome is unknown.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Request failed local validation before being sent.
    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),

    /// Gateway was unreachable or returned an unusable response.
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}
