//! Orders, order items, and the commission split.

use crate::error::CommerceError;
use crate::ids::{OrderId, OrderItemId, ProductId, UserId, VendorId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Marketplace commission rate in basis points (15%).
pub const COMMISSION_RATE_BASIS_POINTS: i64 = 1500;

/// Order lifecycle status.
///
/// `Pending` is the initial state while the gateway charge runs.
/// `PendingPayment` means the gateway accepted the charge but has not
/// settled it yet (offline or deferred payment methods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, charge in flight.
    #[default]
    Pending,
    /// Charge approved and settled.
    Paid,
    /// Charge accepted but awaiting settlement.
    PendingPayment,
    /// Charge rejected by the gateway.
    PaymentFailed,
    /// Pipeline failed before or during the charge; compensated.
    Failed,
    /// Delivered and confirmed by the buyer.
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::PaymentFailed => "payment_failed",
            OrderStatus::Failed => "failed",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "pending_payment" => Some(OrderStatus::PendingPayment),
            "payment_failed" => Some(OrderStatus::PaymentFailed),
            "failed" => Some(OrderStatus::Failed),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    /// Check whether a transition to the given status is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, PendingPayment)
                | (Pending, PaymentFailed)
                | (Pending, Failed)
                | (PendingPayment, Paid)
                | (PendingPayment, PaymentFailed)
                | (Paid, Completed)
        )
    }

    /// Check if this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::PaymentFailed | OrderStatus::Failed | OrderStatus::Completed
        )
    }
}

/// The 15% / 85% split of a single item price.
///
/// `commission + vendor_amount` always equals the price exactly: the
/// commission is rounded and the vendor amount is the remainder, never
/// rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionSplit {
    /// Item price the split was computed from.
    pub price: Money,
    /// Marketplace share.
    pub commission: Money,
    /// Vendor share.
    pub vendor_amount: Money,
}

impl CommissionSplit {
    /// Split a price at the marketplace commission rate.
    pub fn of(price: Money) -> Self {
        let commission = price.percentage_bp(COMMISSION_RATE_BASIS_POINTS);
        let vendor_amount = Money::new(price.amount - commission.amount, price.currency);
        Self {
            price,
            commission,
            vendor_amount,
        }
    }
}

/// Per-order money rollup. Item-level splits are authoritative; these
/// totals are sums of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of item prices.
    pub total: Money,
    /// Sum of item commissions.
    pub commission: Money,
    /// Sum of item vendor shares.
    pub vendor_total: Money,
}

impl OrderTotals {
    /// Roll up totals from item prices by summing per-item splits.
    pub fn for_prices(prices: impl Iterator<Item = Money>) -> Self {
        let mut total = Money::zero(Currency::CLP);
        let mut commission = Money::zero(Currency::CLP);
        let mut vendor_total = Money::zero(Currency::CLP);
        for price in prices {
            let split = CommissionSplit::of(price);
            total = total + split.price;
            commission = commission + split.commission;
            vendor_total = vendor_total + split.vendor_amount;
        }
        Self {
            total,
            commission,
            vendor_total,
        }
    }
}

/// A purchase of one or more items from a single vendor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Buying user.
    pub buyer_id: UserId,
    /// Selling vendor, same for every item.
    pub vendor_id: VendorId,
    /// Sum of item prices before charges. Equal to `total` while the
    /// marketplace has no shipping charge.
    pub subtotal: Money,
    /// Marketplace share, summed from the per-item splits.
    pub commission_total: Money,
    /// Amount charged to the buyer.
    pub total: Money,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Buyer full name as entered at checkout.
    pub buyer_name: String,
    /// Buyer email.
    pub buyer_email: String,
    /// Buyer phone.
    pub buyer_phone: String,
    /// Buyer RUT, normalized (no dots, no dash, uppercase K).
    pub buyer_rut: String,
    /// Shipping region.
    pub shipping_region: String,
    /// Shipping city.
    pub shipping_city: String,
    /// Shipping street address.
    pub shipping_address: String,
    /// Optional delivery notes.
    pub shipping_notes: Option<String>,
    /// Gateway payment ID, set once the charge has run.
    pub payment_id: Option<String>,
    /// Raw gateway status string for audit (e.g. "approved").
    pub payment_status: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Build a pending order from a validated checkout form. The RUT is
    /// stored normalized; the form keeps the display format.
    pub fn from_checkout(
        buyer_id: UserId,
        vendor_id: VendorId,
        totals: OrderTotals,
        draft: &crate::checkout::BuyerDraft,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: OrderId::generate(),
            buyer_id,
            vendor_id,
            subtotal: totals.total,
            commission_total: totals.commission,
            total: totals.total,
            status: OrderStatus::Pending,
            buyer_name: draft.full_name.trim().to_string(),
            buyer_email: draft.email.trim().to_string(),
            buyer_phone: draft.phone.trim().to_string(),
            buyer_rut: draft.normalized_rut(),
            shipping_region: draft.region.trim().to_string(),
            shipping_city: draft.city.trim().to_string(),
            shipping_address: draft.address.trim().to_string(),
            shipping_notes: draft.notes().map(str::to_string),
            payment_id: None,
            payment_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to a new status, enforcing the lifecycle rules.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(next) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Record the gateway charge outcome for audit.
    pub fn record_payment(&mut self, payment_id: impl Into<String>, status: impl Into<String>) {
        self.payment_id = Some(payment_id.into());
        self.payment_status = Some(status.into());
        self.updated_at = current_timestamp();
    }
}

/// A single line of an order, carrying its own commission split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique order item identifier.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Purchased product.
    pub product_id: ProductId,
    /// Selling vendor.
    pub vendor_id: VendorId,
    /// Price at time of purchase.
    pub price: Money,
    /// Marketplace share of the price.
    pub commission_amount: Money,
    /// Vendor share of the price.
    pub vendor_amount: Money,
}

impl OrderItem {
    /// Build a line for an order, computing the commission split.
    pub fn new(order_id: OrderId, product_id: ProductId, vendor_id: VendorId, price: Money) -> Self {
        let split = CommissionSplit::of(price);
        Self {
            id: OrderItemId::generate(),
            order_id,
            product_id,
            vendor_id,
            price,
            commission_amount: split.commission,
            vendor_amount: split.vendor_amount,
        }
    }
}

/// Settlement state of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Funds captured.
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
        }
    }
}

/// Ledger record written when a charge is approved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: crate::ids::TransactionId,
    /// Order the funds belong to.
    pub order_id: OrderId,
    /// Gateway payment ID.
    pub payment_id: String,
    /// Amount captured.
    pub amount: Money,
    /// Settlement state.
    pub status: TransactionStatus,
    /// Gateway payment method identifier.
    pub payment_method: String,
    /// Unix timestamp of capture.
    pub created_at: i64,
}

impl Transaction {
    /// Record a completed capture.
    pub fn completed(
        order_id: OrderId,
        payment_id: impl Into<String>,
        amount: Money,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::ids::TransactionId::generate(),
            order_id,
            payment_id: payment_id.into(),
            amount,
            status: TransactionStatus::Completed,
            payment_method: payment_method.into(),
            created_at: current_timestamp(),
        }
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
