//! In-memory datastore for tests and local development.

use crate::error::StoreError;
use crate::store::{Datastore, ProductFilter};
use async_trait::async_trait;
use redy_auth::{Profile, Role};
use redy_commerce::ids::{CategoryId, OrderId, ProductId, UserId};
use redy_commerce::prelude::{Category, Order, OrderItem, OrderStatus, Product, Transaction};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    order_items: Vec<OrderItem>,
    profiles: HashMap<UserId, Profile>,
    transactions: Vec<Transaction>,
    categories: HashMap<CategoryId, Category>,
}

/// A [`Datastore`] backed by in-process maps. The single mutex makes
/// `reserve_product` trivially atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product, bypassing the approval flow.
    pub fn seed_product(&self, product: Product) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.products.insert(product.id.clone(), product);
        }
    }

    /// Seed a profile.
    pub fn seed_profile(&self, profile: Profile) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.profiles.insert(profile.id.clone(), profile);
        }
    }

    /// Seed a category.
    pub fn seed_category(&self, category: Category) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.categories.insert(category.id.clone(), category);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        inner.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock()?.orders.get(id).cloned())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let order = inner
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        order.status = status;
        Ok(())
    }

    async fn update_order_payment(
        &self,
        id: &OrderId,
        payment_id: &str,
        payment_status: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let order = inner
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        order.record_payment(payment_id, payment_status);
        Ok(())
    }

    async fn insert_order_items(&self, items: &[OrderItem]) -> Result<(), StoreError> {
        self.lock()?.order_items.extend_from_slice(items);
        Ok(())
    }

    async fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .lock()?
            .order_items
            .iter()
            .filter(|i| &i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn orders_with_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .lock()?
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.lock()?.products.get(id).cloned())
    }

    async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let inner = self.lock()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| {
                filter
                    .vendor_id
                    .as_ref()
                    .map_or(true, |v| &p.vendor_id == v)
                    && filter
                        .category_id
                        .as_ref()
                        .map_or(true, |c| &p.category_id == c)
                    && filter
                        .approval_status
                        .map_or(true, |s| p.approval_status == s)
                    && (!filter.only_available || p.available)
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn reserve_product(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner.products.get_mut(id) {
            Some(product) if product.available => {
                product.available = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_product(&self, id: &ProductId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let product = inner
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        product.available = true;
        Ok(())
    }

    async fn apply_approval(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let stored = inner
            .products
            .get_mut(&product.id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", product.id)))?;
        stored.approval_status = product.approval_status;
        stored.approved_by = product.approved_by.clone();
        stored.approved_at = product.approved_at;
        stored.rejection_reason = product.rejection_reason.clone();
        stored.updated_at = product.updated_at;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> = self.lock()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.lock()?.profiles.get(id).cloned())
    }

    async fn profiles_with_role(&self, role: Role) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .filter(|p| p.role == role)
            .cloned()
            .collect())
    }

    async fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.lock()?.transactions.push(transaction.clone());
        Ok(())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut transactions = self.lock()?.transactions.clone();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redy_commerce::ids::{CategoryId, VendorId};
    use redy_commerce::prelude::{Condition, Money};

    fn approved_product(vendor: &str) -> Product {
        let mut product = Product::new(
            VendorId::new(vendor),
            CategoryId::new("cat-1"),
            "Mountain bike",
            Money::clp(120_000),
            Condition::Good,
        );
        product.approve(UserId::new("admin-1")).unwrap();
        product
    }

    #[tokio::test]
    async fn test_reserve_is_single_winner() {
        let store = MemoryStore::new();
        let product = approved_product("v1");
        let id = product.id.clone();
        store.seed_product(product);

        assert!(store.reserve_product(&id).await.unwrap());
        assert!(!store.reserve_product(&id).await.unwrap());

        store.release_product(&id).await.unwrap();
        assert!(store.reserve_product(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_missing_product_fails() {
        let store = MemoryStore::new();
        assert!(!store.reserve_product(&ProductId::new("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_visible_filter() {
        let store = MemoryStore::new();
        let visible = approved_product("v1");
        let visible_id = visible.id.clone();
        store.seed_product(visible);

        // Pending product stays out of the storefront.
        store.seed_product(Product::new(
            VendorId::new("v1"),
            CategoryId::new("cat-1"),
            "Old lamp",
            Money::clp(5_000),
            Condition::Good,
        ));

        let listed = store.products(&ProductFilter::visible()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, visible_id);

        // Reserving hides it from the storefront too.
        store.reserve_product(&visible_id).await.unwrap();
        assert!(store.products(&ProductFilter::visible()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_ordered_by_name() {
        let store = MemoryStore::new();
        store.seed_category(Category::new("Muebles"));
        store.seed_category(Category::new("Bicicletas"));
        store.seed_category(Category::new("Electrónica"));

        let names: Vec<String> = store
            .categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Bicicletas", "Electrónica", "Muebles"]);
    }

    #[tokio::test]
    async fn test_duplicate_order_insert_conflicts() {
        let store = MemoryStore::new();
        let order = Order {
            id: OrderId::new("o1"),
            buyer_id: UserId::new("u1"),
            vendor_id: VendorId::new("v1"),
            subtotal: Money::clp(1000),
            commission_total: Money::clp(150),
            total: Money::clp(1000),
            status: OrderStatus::Pending,
            buyer_name: String::new(),
            buyer_email: String::new(),
            buyer_phone: String::new(),
            buyer_rut: String::new(),
            shipping_region: String::new(),
            shipping_city: String::new(),
            shipping_address: String::new(),
            shipping_notes: None,
            payment_id: None,
            payment_status: None,
            created_at: 0,
            updated_at: 0,
        };
        store.insert_order(&order).await.unwrap();
        assert!(matches!(
            store.insert_order(&order).await,
            Err(StoreError::Conflict(_))
        ));
    }
}
