//! Product and approval types.

use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId, UserId, VendorId};
use crate::money::Money;
use crate::order::CommissionSplit;
use serde::{Deserialize, Serialize};

/// Moderation state gating marketplace visibility.
///
/// Both `Approved` and `Rejected` are terminal; there is no re-submission
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApprovalStatus {
    /// Awaiting admin review, not visible to buyers.
    #[default]
    Pending,
    /// Approved and listed.
    Approved,
    /// Rejected with a reason.
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }

    /// Check if this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

/// Condition of a second-hand listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    /// Like new.
    Excellent,
    /// Light signs of use.
    VeryGood,
    /// Visible signs of use.
    #[default]
    Good,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::VeryGood => "very_good",
            Condition::Good => "good",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::VeryGood => "Very good",
            Condition::Good => "Good",
        }
    }
}

/// A single-unit listing in the marketplace.
///
/// There is no quantity field: a purchase flips `available` to false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Selling vendor.
    pub vendor_id: VendorId,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: Option<String>,
    /// Listed price.
    pub price: Money,
    /// Condition of the item.
    pub condition: Condition,
    /// Image URLs, first is primary.
    pub images: Vec<String>,
    /// Whether the unit can still be purchased.
    pub available: bool,
    /// Moderation state.
    pub approval_status: ApprovalStatus,
    /// Admin who resolved the review.
    pub approved_by: Option<UserId>,
    /// Unix timestamp of the review decision.
    pub approved_at: Option<i64>,
    /// Reason supplied on rejection.
    pub rejection_reason: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a new listing awaiting approval.
    pub fn new(
        vendor_id: VendorId,
        category_id: CategoryId,
        name: impl Into<String>,
        price: Money,
        condition: Condition,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ProductId::generate(),
            vendor_id,
            category_id,
            name: name.into(),
            description: None,
            price,
            condition,
            images: Vec::new(),
            available: true,
            approval_status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the listing is visible to buyers.
    pub fn is_visible(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved && self.available
    }

    /// The 15% commission / 85% vendor share preview shown on the admin
    /// review page.
    pub fn commission_preview(&self) -> CommissionSplit {
        CommissionSplit::of(self.price)
    }

    /// Mark the listing approved, stamping the audit fields.
    pub fn approve(&mut self, admin: UserId) -> Result<(), CommerceError> {
        self.transition_approval(ApprovalStatus::Approved)?;
        self.approved_by = Some(admin);
        self.approved_at = Some(current_timestamp());
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Mark the listing rejected with a non-empty reason, stamping the
    /// audit fields.
    pub fn reject(&mut self, admin: UserId, reason: impl Into<String>) -> Result<(), CommerceError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(CommerceError::EmptyRejectionReason);
        }
        self.transition_approval(ApprovalStatus::Rejected)?;
        self.approved_by = Some(admin);
        self.approved_at = Some(current_timestamp());
        self.rejection_reason = Some(reason);
        self.updated_at = current_timestamp();
        Ok(())
    }

    fn transition_approval(&mut self, to: ApprovalStatus) -> Result<(), CommerceError> {
        if self.approval_status != ApprovalStatus::Pending {
            return Err(CommerceError::InvalidApprovalTransition {
                from: self.approval_status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.approval_status = to;
        Ok(())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Product {
        Product::new(
            VendorId::new("v1"),
            CategoryId::new("cat-1"),
            "Mountain bike",
            Money::clp(120_000),
            Condition::VeryGood,
        )
    }

    #[test]
    fn test_new_listing_is_pending_and_hidden() {
        let product = listing();
        assert_eq!(product.approval_status, ApprovalStatus::Pending);
        assert!(product.available);
        assert!(!product.is_visible());
    }

    #[test]
    fn test_approve_stamps_audit_fields() {
        let mut product = listing();
        product.approve(UserId::new("admin-1")).unwrap();
        assert_eq!(product.approval_status, ApprovalStatus::Approved);
        assert_eq!(product.approved_by, Some(UserId::new("admin-1")));
        assert!(product.approved_at.is_some());
        assert!(product.is_visible());
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut product = listing();
        assert!(matches!(
            product.reject(UserId::new("admin-1"), "   "),
            Err(CommerceError::EmptyRejectionReason)
        ));
        assert_eq!(product.approval_status, ApprovalStatus::Pending);

        product
            .reject(UserId::new("admin-1"), "Photos are too blurry")
            .unwrap();
        assert_eq!(product.approval_status, ApprovalStatus::Rejected);
        assert_eq!(
            product.rejection_reason.as_deref(),
            Some("Photos are too blurry")
        );
    }

    #[test]
    fn test_approval_is_terminal() {
        let mut product = listing();
        product.approve(UserId::new("admin-1")).unwrap();
        assert!(product.approve(UserId::new("admin-2")).is_err());
        assert!(product.reject(UserId::new("admin-2"), "late").is_err());
    }

    #[test]
    fn test_commission_preview() {
        let product = listing();
        let split = product.commission_preview();
        assert_eq!(split.commission.amount, 18_000);
        assert_eq!(split.vendor_amount.amount, 102_000);
    }
}
