//! Typed gateway requests and responses.

use crate::error::PaymentError;
use async_trait::async_trait;
use redy_commerce::ids::PaymentId;
use redy_commerce::money::Money;
use serde::{Deserialize, Serialize};

/// Outcome of a charge as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds captured.
    Approved,
    /// Charge accepted, settlement deferred (e.g. bank transfer).
    Pending,
    /// Charge declined.
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Approved => "approved",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" => Some(PaymentStatus::Approved),
            "pending" | "in_process" => Some(PaymentStatus::Pending),
            "rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }

    /// Whether the order proceeds (approved or pending settlement).
    pub fn is_accepted(&self) -> bool {
        !matches!(self, PaymentStatus::Rejected)
    }
}

/// The person being charged. The RUT is the identification number the
/// gateway requires for Chilean payers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    /// Payer email.
    pub email: String,
    /// Payer RUT, normalized.
    pub rut: String,
}

/// How the buyer chose to pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Tokenized card payment.
    Card {
        /// One-time card token from the gateway's client SDK.
        token: String,
        /// Gateway method identifier (e.g. "visa").
        payment_method_id: String,
        /// Number of installments.
        installments: u32,
        /// Issuing bank, when the gateway requires disambiguation.
        issuer_id: Option<String>,
    },
    /// Redirect wallet payment.
    Wallet {
        /// Gateway method identifier.
        payment_method_id: String,
    },
}

impl PaymentMethod {
    /// The gateway method identifier.
    pub fn payment_method_id(&self) -> &str {
        match self {
            PaymentMethod::Card {
                payment_method_id, ..
            } => payment_method_id,
            PaymentMethod::Wallet { payment_method_id } => payment_method_id,
        }
    }

    /// Reject structurally invalid methods before they reach the wire.
    pub fn validate(&self) -> Result<(), PaymentError> {
        match self {
            PaymentMethod::Card {
                token,
                payment_method_id,
                installments,
                ..
            } => {
                if token.is_empty() {
                    return Err(PaymentError::InvalidRequest("missing card token".into()));
                }
                if payment_method_id.is_empty() {
                    return Err(PaymentError::InvalidRequest(
                        "missing payment method id".into(),
                    ));
                }
                if *installments == 0 {
                    return Err(PaymentError::InvalidRequest(
                        "installments must be at least 1".into(),
                    ));
                }
                Ok(())
            }
            PaymentMethod::Wallet { payment_method_id } => {
                if payment_method_id.is_empty() {
                    return Err(PaymentError::InvalidRequest(
                        "missing payment method id".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A charge to submit to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount to capture.
    pub amount: Money,
    /// Statement description shown to the buyer.
    pub description: String,
    /// Who is paying.
    pub payer: Payer,
    /// How they are paying.
    pub method: PaymentMethod,
}

impl ChargeRequest {
    /// Validate the request before submission.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if !self.amount.is_positive() {
            return Err(PaymentError::InvalidRequest(
                "amount must be positive".into(),
            ));
        }
        if self.payer.email.is_empty() {
            return Err(PaymentError::InvalidRequest("missing payer email".into()));
        }
        self.method.validate()
    }
}

/// The gateway's answer to a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Gateway payment ID.
    pub id: PaymentId,
    /// Parsed outcome.
    pub status: PaymentStatus,
    /// Raw gateway status detail (e.g. "cc_rejected_insufficient_amount").
    pub status_detail: Option<String>,
    /// Gateway method identifier the charge ran under.
    pub payment_method_id: String,
}

/// External payment processor seam.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a charge. A decline is an Ok result carrying rejected
    /// status; Err means the outcome is unknown.
    async fn charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> PaymentMethod {
        PaymentMethod::Card {
            token: "tok_123".to_string(),
            payment_method_id: "visa".to_string(),
            installments: 1,
            issuer_id: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let request = ChargeRequest {
            amount: Money::clp(15_990),
            description: "REDY order".to_string(),
            payer: Payer {
                email: "ana@example.cl".to_string(),
                rut: "123456785".to_string(),
            },
            method: card(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let request = ChargeRequest {
            amount: Money::clp(0),
            description: String::new(),
            payer: Payer {
                email: "ana@example.cl".to_string(),
                rut: "123456785".to_string(),
            },
            method: card(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_card_requires_token_and_installments() {
        let method = PaymentMethod::Card {
            token: String::new(),
            payment_method_id: "visa".to_string(),
            installments: 1,
            issuer_id: None,
        };
        assert!(method.validate().is_err());

        let method = PaymentMethod::Card {
            token: "tok_123".to_string(),
            payment_method_id: "visa".to_string(),
            installments: 0,
            issuer_id: None,
        };
        assert!(method.validate().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            PaymentStatus::from_str("approved"),
            Some(PaymentStatus::Approved)
        );
        assert_eq!(
            PaymentStatus::from_str("in_process"),
            Some(PaymentStatus::Pending)
        );
        assert_eq!(PaymentStatus::from_str("weird"), None);
        assert!(PaymentStatus::Pending.is_accepted());
        assert!(!PaymentStatus::Rejected.is_accepted());
    }
}
