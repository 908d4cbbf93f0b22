//! Checkout orchestration for REDY.
//!
//! Ties the domain types together into the three marketplace flows:
//!
//! - [`session`]: the interactive two-phase checkout session
//! - [`pipeline`]: order creation against the datastore and gateway,
//!   with compensation on failure
//! - [`approval`]: the admin listing review queue and stats

pub mod approval;
pub mod error;
pub mod pipeline;
pub mod session;

pub use approval::{AdminStats, ApprovalPipeline};
pub use error::CheckoutError;
pub use pipeline::{OrderPipeline, PipelineReceipt};
pub use session::{CheckoutEntry, CheckoutSession, EventOutcome, PaymentEvent};
