//! Payment gateway contract for REDY.
//!
//! The [`PaymentGateway`] trait is the seam to the external card
//! processor. Requests and responses are typed; the raw gateway status
//! string is kept alongside the parsed status for audit.

pub mod error;
pub mod gateway;
pub mod mock;

pub use error::PaymentError;
pub use gateway::{
    Charge, ChargeRequest, Payer, PaymentGateway, PaymentMethod, PaymentStatus,
};
pub use mock::{MockBehavior, MockGateway};
