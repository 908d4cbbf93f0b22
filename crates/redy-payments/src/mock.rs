//! Scripted gateway for tests.

use crate::error::PaymentError;
use crate::gateway::{Charge, ChargeRequest, PaymentGateway, PaymentStatus};
use async_trait::async_trait;
use redy_commerce::ids::PaymentId;
use std::sync::Mutex;

/// What the mock does with every charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Approve every charge.
    Approve,
    /// Reject every charge.
    Reject,
    /// Accept every charge with deferred settlement.
    Pending,
    /// Fail with a gateway error, leaving the outcome unknown.
    Fail,
}

/// A [`PaymentGateway`] that follows a fixed script and records every
/// request it sees.
pub struct MockGateway {
    behavior: MockBehavior,
    requests: Mutex<Vec<ChargeRequest>>,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn approving() -> Self {
        Self::new(MockBehavior::Approve)
    }

    pub fn rejecting() -> Self {
        Self::new(MockBehavior::Reject)
    }

    pub fn pending() -> Self {
        Self::new(MockBehavior::Pending)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Fail)
    }

    /// Number of charges attempted.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copies of every request received.
    pub fn requests(&self) -> Vec<ChargeRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentError> {
        request.validate()?;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let (status, detail) = match self.behavior {
            MockBehavior::Approve => (PaymentStatus::Approved, "accredited"),
            MockBehavior::Reject => (PaymentStatus::Rejected, "cc_rejected_other_reason"),
            MockBehavior::Pending => (PaymentStatus::Pending, "pending_contingency"),
            MockBehavior::Fail => {
                return Err(PaymentError::Gateway("mock gateway failure".into()));
            }
        };

        Ok(Charge {
            id: PaymentId::generate(),
            status,
            status_detail: Some(detail.to_string()),
            payment_method_id: request.method.payment_method_id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Payer, PaymentMethod};
    use redy_commerce::money::Money;

    fn request() -> ChargeRequest {
        ChargeRequest {
            amount: Money::clp(10_000),
            description: "REDY order".to_string(),
            payer: Payer {
                email: "ana@example.cl".to_string(),
                rut: "123456785".to_string(),
            },
            method: PaymentMethod::Card {
                token: "tok_123".to_string(),
                payment_method_id: "visa".to_string(),
                installments: 1,
                issuer_id: None,
            },
        }
    }

    #[tokio::test]
    async fn test_approving_records_requests() {
        let gateway = MockGateway::approving();
        let charge = gateway.charge(&request()).await.unwrap();
        assert_eq!(charge.status, PaymentStatus::Approved);
        assert_eq!(charge.payment_method_id, "visa");
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.requests()[0].amount, Money::clp(10_000));
    }

    #[tokio::test]
    async fn test_rejecting_is_ok_with_rejected_status() {
        let gateway = MockGateway::rejecting();
        let charge = gateway.charge(&request()).await.unwrap();
        assert_eq!(charge.status, PaymentStatus::Rejected);
        assert!(!charge.status.is_accepted());
    }

    #[tokio::test]
    async fn test_failing_returns_error_after_recording() {
        let gateway = MockGateway::failing();
        assert!(gateway.charge(&request()).await.is_err());
        assert_eq!(gateway.call_count(), 1);
    }
}
