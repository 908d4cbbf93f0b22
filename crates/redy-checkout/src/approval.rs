//! Admin listing review.

use crate::error::CheckoutError;
use redy_auth::{AuthError, Identity, Role};
use redy_commerce::ids::ProductId;
use redy_commerce::prelude::{ApprovalStatus, Money, OrderStatus, Product};
use redy_commerce::Currency;
use redy_db::{Datastore, ProductFilter};
use tracing::info;

/// Marketplace rollup for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    /// Listings awaiting review.
    pub pending_products: usize,
    /// Listings live or sold.
    pub approved_products: usize,
    /// Listings turned down.
    pub rejected_products: usize,
    /// Registered sellers.
    pub active_vendors: usize,
    /// Orders paid or completed.
    pub paid_orders: usize,
    /// Sum of paid order totals.
    pub total_sales: Money,
    /// Marketplace share of those sales.
    pub total_commission: Money,
}

/// Runs the review queue against injected persistence.
pub struct ApprovalPipeline<'a> {
    db: &'a dyn Datastore,
}

impl<'a> ApprovalPipeline<'a> {
    pub fn new(db: &'a dyn Datastore) -> Self {
        Self { db }
    }

    /// Listings awaiting review, newest first.
    pub async fn review_queue(&self, admin: &Identity) -> Result<Vec<Product>, CheckoutError> {
        self.require_admin(admin).await?;
        Ok(self.db.products(&ProductFilter::pending_review()).await?)
    }

    /// Approve a pending listing. Re-approving an approved listing is a
    /// no-op, so a double-submitted review does not fail.
    pub async fn approve(
        &self,
        admin: &Identity,
        product_id: &ProductId,
    ) -> Result<Product, CheckoutError> {
        self.require_admin(admin).await?;
        let mut product = self.load(product_id).await?;
        if product.approval_status == ApprovalStatus::Approved {
            return Ok(product);
        }
        product.approve(admin.user_id.clone())?;
        self.db.apply_approval(&product).await?;
        info!(product_id = %product.id, admin = %admin.user_id, "listing approved");
        Ok(product)
    }

    /// Reject a pending listing with a reason. Re-rejecting a rejected
    /// listing is a no-op.
    pub async fn reject(
        &self,
        admin: &Identity,
        product_id: &ProductId,
        reason: &str,
    ) -> Result<Product, CheckoutError> {
        self.require_admin(admin).await?;
        let mut product = self.load(product_id).await?;
        if product.approval_status == ApprovalStatus::Rejected {
            return Ok(product);
        }
        product.reject(admin.user_id.clone(), reason)?;
        self.db.apply_approval(&product).await?;
        info!(product_id = %product.id, admin = %admin.user_id, "listing rejected");
        Ok(product)
    }

    /// Rollup of listings and sales.
    ///
    /// Sales and commission are summed from the per-item splits of paid
    /// and completed orders, so they match the vendor payouts exactly.
    pub async fn stats(&self, admin: &Identity) -> Result<AdminStats, CheckoutError> {
        self.require_admin(admin).await?;

        let pending_products = self.count_products(ApprovalStatus::Pending).await?;
        let approved_products = self.count_products(ApprovalStatus::Approved).await?;
        let rejected_products = self.count_products(ApprovalStatus::Rejected).await?;
        let active_vendors = self.db.profiles_with_role(Role::Seller).await?.len();

        let mut paid_orders = 0;
        let mut total_sales = Money::zero(Currency::CLP);
        let mut total_commission = Money::zero(Currency::CLP);
        for status in [OrderStatus::Paid, OrderStatus::Completed] {
            for order in self.db.orders_with_status(status).await? {
                paid_orders += 1;
                total_sales = total_sales + order.total;
                for item in self.db.order_items(&order.id).await? {
                    total_commission = total_commission + item.commission_amount;
                }
            }
        }

        Ok(AdminStats {
            pending_products,
            approved_products,
            rejected_products,
            active_vendors,
            paid_orders,
            total_sales,
            total_commission,
        })
    }

    async fn count_products(&self, status: ApprovalStatus) -> Result<usize, CheckoutError> {
        let filter = ProductFilter {
            approval_status: Some(status),
            ..Default::default()
        };
        Ok(self.db.products(&filter).await?.len())
    }

    async fn require_admin(&self, admin: &Identity) -> Result<(), CheckoutError> {
        let profile = self
            .db
            .get_profile(&admin.user_id)
            .await?
            .ok_or_else(|| AuthError::ProfileNotFound(admin.user_id.to_string()))?;
        if profile.role != Role::Admin {
            return Err(AuthError::Forbidden {
                required: Role::Admin.as_str().to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn load(&self, product_id: &ProductId) -> Result<Product, CheckoutError> {
        self.db
            .get_product(product_id)
            .await?
            .ok_or_else(|| CheckoutError::Commerce(
                redy_commerce::CommerceError::ProductNotFound(product_id.to_string()),
            ))
    }
}
