//! Order creation pipeline.
//!
//! Creating an order is a sequence of side effects against the datastore
//! and the payment gateway, with compensation when a later stage fails:
//!
//! 1. reserve every cart item (atomic per unit, single winner)
//! 2. insert the order and its items, pending
//! 3. charge the gateway, at most once
//! 4. reconcile the charge outcome onto the order
//!
//! A failed reservation releases the units already taken. A gateway
//! error releases everything and marks the order failed. A rejected
//! charge releases the units and marks the order payment-failed; a
//! pending charge keeps the reservation, since settlement is expected.

use crate::error::CheckoutError;
use redy_auth::Identity;
use redy_commerce::cart::CartItem;
use redy_commerce::checkout::BuyerDraft;
use redy_commerce::ids::{OrderId, ProductId, VendorId};
use redy_commerce::prelude::{Order, OrderItem, OrderStatus, OrderTotals, Transaction};
use redy_commerce::{Currency, Money};
use redy_db::Datastore;
use redy_payments::{Charge, ChargeRequest, Payer, PaymentGateway, PaymentMethod, PaymentStatus};
use tracing::{info, warn};

/// What the pipeline produced: the order in its reconciled status and
/// the gateway charge that decided it.
#[derive(Debug, Clone)]
pub struct PipelineReceipt {
    pub order: Order,
    pub charge: Charge,
}

/// Runs order creation against injected persistence and gateway.
pub struct OrderPipeline<'a> {
    db: &'a dyn Datastore,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> OrderPipeline<'a> {
    pub fn new(db: &'a dyn Datastore, gateway: &'a dyn PaymentGateway) -> Self {
        Self { db, gateway }
    }

    /// Create an order for the cart contents and charge the buyer.
    ///
    /// The draft must already be validated; the session enforces that
    /// before payment is reachable.
    pub async fn run(
        &self,
        buyer: &Identity,
        draft: &BuyerDraft,
        items: &[CartItem],
        vendor_id: &VendorId,
        method: PaymentMethod,
    ) -> Result<PipelineReceipt, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Rejects mixed currencies before the rollup runs.
        Money::try_sum(items.iter().map(|i| &i.price), Currency::CLP)
            .ok_or(redy_commerce::CommerceError::Overflow)?;
        let totals = OrderTotals::for_prices(items.iter().map(|i| i.price));
        let total = totals.total;

        let reserved = self.reserve_all(items).await?;

        let order = Order::from_checkout(
            buyer.user_id.clone(),
            vendor_id.clone(),
            totals,
            draft,
        );
        let order_items: Vec<OrderItem> = items
            .iter()
            .map(|i| {
                OrderItem::new(
                    order.id.clone(),
                    i.product_id.clone(),
                    i.vendor_id.clone(),
                    i.price,
                )
            })
            .collect();

        if let Err(e) = self.insert_order(&order, &order_items).await {
            self.release_all(&reserved).await;
            return Err(e);
        }

        info!(
            order_id = %order.id,
            total = %total,
            items = items.len(),
            "order created, charging gateway"
        );

        let request = ChargeRequest {
            amount: total,
            description: format!("REDY order {}", order.id),
            payer: Payer {
                email: order.buyer_email.clone(),
                rut: order.buyer_rut.clone(),
            },
            method,
        };

        let charge = match self.gateway.charge(&request).await {
            Ok(charge) => charge,
            Err(e) => {
                // Outcome unknown: compensate fully and surface the error.
                warn!(order_id = %order.id, error = %e, "gateway error, compensating");
                self.release_all(&reserved).await;
                self.db
                    .update_order_status(&order.id, OrderStatus::Failed)
                    .await?;
                return Err(e.into());
            }
        };

        let order = self.reconcile(order, &charge, &reserved).await?;
        Ok(PipelineReceipt { order, charge })
    }

    /// Look up an order for its confirmation page. Only the buyer may
    /// see it.
    pub async fn confirmation(
        &self,
        buyer: &Identity,
        order_id: &OrderId,
    ) -> Result<(Order, Vec<OrderItem>), CheckoutError> {
        let order = self
            .db
            .get_order(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;
        if order.buyer_id != buyer.user_id {
            return Err(CheckoutError::NotOrderOwner);
        }
        let items = self.db.order_items(order_id).await?;
        Ok((order, items))
    }

    /// Buyer confirms delivery; settles a paid order as completed.
    pub async fn confirm_receipt(
        &self,
        buyer: &Identity,
        order_id: &OrderId,
    ) -> Result<Order, CheckoutError> {
        let (mut order, _) = self.confirmation(buyer, order_id).await?;
        order.transition_to(OrderStatus::Completed)?;
        self.db
            .update_order_status(&order.id, OrderStatus::Completed)
            .await?;
        info!(order_id = %order.id, "order completed by buyer");
        Ok(order)
    }

    /// Reserve every item, releasing the ones already taken if any unit
    /// loses its race.
    async fn reserve_all(&self, items: &[CartItem]) -> Result<Vec<ProductId>, CheckoutError> {
        let mut reserved = Vec::with_capacity(items.len());
        for item in items {
            match self.db.reserve_product(&item.product_id).await {
                Ok(true) => reserved.push(item.product_id.clone()),
                Ok(false) => {
                    warn!(product_id = %item.product_id, "reservation lost, compensating");
                    self.release_all(&reserved).await;
                    return Err(CheckoutError::ProductUnavailable(
                        item.product_id.to_string(),
                    ));
                }
                Err(e) => {
                    self.release_all(&reserved).await;
                    return Err(e.into());
                }
            }
        }
        Ok(reserved)
    }

    async fn insert_order(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<(), CheckoutError> {
        self.db.insert_order(order).await?;
        self.db.insert_order_items(items).await?;
        Ok(())
    }

    /// Map the gateway outcome onto the order and undo reservations for
    /// a decline.
    async fn reconcile(
        &self,
        mut order: Order,
        charge: &Charge,
        reserved: &[ProductId],
    ) -> Result<Order, CheckoutError> {
        self.db
            .update_order_payment(&order.id, charge.id.as_str(), charge.status.as_str())
            .await?;
        order.record_payment(charge.id.as_str(), charge.status.as_str());

        let next = match charge.status {
            PaymentStatus::Approved => OrderStatus::Paid,
            PaymentStatus::Pending => OrderStatus::PendingPayment,
            PaymentStatus::Rejected => OrderStatus::PaymentFailed,
        };
        order.transition_to(next)?;
        self.db.update_order_status(&order.id, next).await?;

        match charge.status {
            PaymentStatus::Approved => {
                let transaction = Transaction::completed(
                    order.id.clone(),
                    charge.id.as_str(),
                    order.total,
                    charge.payment_method_id.clone(),
                );
                self.db.insert_transaction(&transaction).await?;
                info!(order_id = %order.id, payment_id = %charge.id, "charge approved");
            }
            PaymentStatus::Pending => {
                // Settlement expected; the reservation stands.
                info!(order_id = %order.id, payment_id = %charge.id, "charge pending settlement");
            }
            PaymentStatus::Rejected => {
                warn!(
                    order_id = %order.id,
                    payment_id = %charge.id,
                    detail = charge.status_detail.as_deref().unwrap_or(""),
                    "charge rejected, releasing items"
                );
                self.release_all(reserved).await;
            }
        }

        Ok(order)
    }

    /// Best-effort release; a failed release is logged, not propagated,
    /// so remaining units still get released.
    async fn release_all(&self, reserved: &[ProductId]) {
        for product_id in reserved {
            if let Err(e) = self.db.release_product(product_id).await {
                warn!(product_id = %product_id, error = %e, "failed to release reservation");
            }
        }
    }
}
