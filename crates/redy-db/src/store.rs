//! The datastore trait.

use crate::error::StoreError;
use async_trait::async_trait;
use redy_auth::{Profile, Role};
use redy_commerce::ids::{CategoryId, OrderId, ProductId, UserId, VendorId};
use redy_commerce::prelude::{Category, Order, OrderItem, OrderStatus, Product, Transaction};

/// Filter for product listing queries. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to one vendor.
    pub vendor_id: Option<VendorId>,
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict to one approval status.
    pub approval_status: Option<redy_commerce::prelude::ApprovalStatus>,
    /// Only products that can still be purchased.
    pub only_available: bool,
}

impl ProductFilter {
    /// The storefront view: approved and available.
    pub fn visible() -> Self {
        Self {
            approval_status: Some(redy_commerce::prelude::ApprovalStatus::Approved),
            only_available: true,
            ..Default::default()
        }
    }

    /// The admin review queue: pending approval.
    pub fn pending_review() -> Self {
        Self {
            approval_status: Some(redy_commerce::prelude::ApprovalStatus::Pending),
            ..Default::default()
        }
    }
}

/// Persistence operations the pipelines run against.
///
/// Implementations must make `reserve_product` an atomic compare-and-set:
/// two concurrent reservations of the same unit must not both succeed.
#[async_trait]
pub trait Datastore: Send + Sync {
    // Orders

    /// Insert a new order row.
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Fetch an order by ID.
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Set an order's lifecycle status.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<(), StoreError>;

    /// Record the gateway charge outcome on an order.
    async fn update_order_payment(
        &self,
        id: &OrderId,
        payment_id: &str,
        payment_status: &str,
    ) -> Result<(), StoreError>;

    /// Insert the lines of an order.
    async fn insert_order_items(&self, items: &[OrderItem]) -> Result<(), StoreError>;

    /// Fetch the lines of an order.
    async fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, StoreError>;

    /// Fetch orders in a given status, newest first.
    async fn orders_with_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError>;

    // Products

    /// Fetch a product by ID.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Fetch products matching a filter.
    async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Atomically flip a product from available to unavailable. Returns
    /// false if the product was already taken (or does not exist).
    async fn reserve_product(&self, id: &ProductId) -> Result<bool, StoreError>;

    /// Make a reserved product available again.
    async fn release_product(&self, id: &ProductId) -> Result<(), StoreError>;

    /// Persist a product's approval fields.
    async fn apply_approval(&self, product: &Product) -> Result<(), StoreError>;

    // Categories

    /// All browsing categories, ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    // Profiles

    /// Fetch a profile by user ID.
    async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Fetch all profiles with a given role.
    async fn profiles_with_role(&self, role: Role) -> Result<Vec<Profile>, StoreError>;

    // Transactions

    /// Record a captured payment.
    async fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// All recorded transactions, newest first.
    async fn transactions(&self) -> Result<Vec<Transaction>, StoreError>;
}
