//! Two-phase checkout stage machine.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Stage of a checkout session.
///
/// Checkout runs in two phases: buyer information first, then payment.
/// A declined or failed payment lands in `Aborted`, which is retryable:
/// the session can return to either earlier stage with the cart intact.
/// `Settled` is the only terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    /// Collecting the buyer information form.
    #[default]
    CollectingInfo,
    /// Form validated, collecting payment.
    AwaitingPayment,
    /// Charge accepted; the order exists and the cart is cleared.
    Settled,
    /// Charge declined or errored; cart preserved for retry.
    Aborted,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::CollectingInfo => "collecting_info",
            CheckoutStage::AwaitingPayment => "awaiting_payment",
            CheckoutStage::Settled => "settled",
            CheckoutStage::Aborted => "aborted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collecting_info" => Some(CheckoutStage::CollectingInfo),
            "awaiting_payment" => Some(CheckoutStage::AwaitingPayment),
            "settled" => Some(CheckoutStage::Settled),
            "aborted" => Some(CheckoutStage::Aborted),
            _ => None,
        }
    }

    /// Check whether a transition to the given stage is allowed.
    pub fn can_transition_to(&self, next: CheckoutStage) -> bool {
        use CheckoutStage::*;
        matches!(
            (self, next),
            (CollectingInfo, AwaitingPayment)
                | (AwaitingPayment, CollectingInfo)
                | (AwaitingPayment, Settled)
                | (AwaitingPayment, Aborted)
                | (Aborted, AwaitingPayment)
                | (Aborted, CollectingInfo)
        )
    }

    /// Transition to the given stage, or fail with the disallowed pair.
    pub fn transition_to(&mut self, next: CheckoutStage) -> Result<(), CommerceError> {
        if !self.can_transition_to(next) {
            return Err(CommerceError::InvalidStageTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        *self = next;
        Ok(())
    }

    /// Check if this stage accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStage::Settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut stage = CheckoutStage::default();
        assert_eq!(stage, CheckoutStage::CollectingInfo);
        stage.transition_to(CheckoutStage::AwaitingPayment).unwrap();
        stage.transition_to(CheckoutStage::Settled).unwrap();
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_aborted_is_retryable() {
        let mut stage = CheckoutStage::AwaitingPayment;
        stage.transition_to(CheckoutStage::Aborted).unwrap();
        stage.transition_to(CheckoutStage::AwaitingPayment).unwrap();
        stage.transition_to(CheckoutStage::Aborted).unwrap();
        stage.transition_to(CheckoutStage::CollectingInfo).unwrap();
    }

    #[test]
    fn test_back_to_edit_info() {
        let mut stage = CheckoutStage::AwaitingPayment;
        stage.transition_to(CheckoutStage::CollectingInfo).unwrap();
    }

    #[test]
    fn test_cannot_skip_info() {
        let mut stage = CheckoutStage::CollectingInfo;
        assert!(stage.transition_to(CheckoutStage::Settled).is_err());
        assert!(stage.transition_to(CheckoutStage::Aborted).is_err());
    }

    #[test]
    fn test_settled_is_final() {
        let mut stage = CheckoutStage::Settled;
        for next in [
            CheckoutStage::CollectingInfo,
            CheckoutStage::AwaitingPayment,
            CheckoutStage::Aborted,
        ] {
            assert!(stage.transition_to(next).is_err());
        }
    }

    #[test]
    fn test_stage_round_trip() {
        for stage in [
            CheckoutStage::CollectingInfo,
            CheckoutStage::AwaitingPayment,
            CheckoutStage::Settled,
            CheckoutStage::Aborted,
        ] {
            assert_eq!(CheckoutStage::from_str(stage.as_str()), Some(stage));
        }
    }
}
