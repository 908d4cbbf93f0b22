//! Cart persistence to durable per-device storage.
//!
//! The storage capability is injected so the cart can be tested without a
//! real device store. Storage is per-device and not authoritative: the
//! server-side order record is the durable copy.

use crate::cart::{AddOutcome, Cart, CartItem, VendorPin};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Fixed key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "redy_cart";

/// Durable per-device key-value storage (the local-storage seam).
pub trait DeviceStorage {
    /// Read a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, CommerceError>;
    /// Write a value by key.
    fn set(&self, key: &str, value: &str) -> Result<(), CommerceError>;
    /// Remove a key.
    fn remove(&self, key: &str) -> Result<(), CommerceError>;
}

/// Serialized cart shape. New fields must be optional so older persisted
/// carts keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredCart {
    /// Cart lines.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Pinned vendor ID.
    #[serde(default, rename = "vendorId")]
    pub vendor_id: Option<String>,
    /// Pinned vendor name.
    #[serde(default, rename = "vendorName")]
    pub vendor_name: Option<String>,
}

impl StoredCart {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            vendor_id: cart.vendor().map(|v| v.id.as_str().to_string()),
            vendor_name: cart.vendor().map(|v| v.name.clone()),
        }
    }

    fn into_cart(self) -> Cart {
        let vendor = match (self.vendor_id, self.vendor_name) {
            (Some(id), Some(name)) => Some(VendorPin {
                id: id.into(),
                name,
            }),
            _ => None,
        };
        Cart::from_parts(self.items, vendor)
    }
}

/// A cart bound to a persistence adapter. Every mutation is mirrored to
/// storage; construction rehydrates from storage when a copy exists.
pub struct CartStore<S: DeviceStorage> {
    cart: Cart,
    storage: S,
}

impl<S: DeviceStorage> CartStore<S> {
    /// Open the cart, rehydrating any persisted copy. An unreadable copy
    /// is discarded rather than failing the session.
    pub fn open(storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<StoredCart>(&raw)
                .map(StoredCart::into_cart)
                .unwrap_or_default(),
            _ => Cart::new(),
        };
        Self { cart, storage }
    }

    /// Add an item and persist on acceptance.
    pub fn add_item(&mut self, item: CartItem) -> Result<AddOutcome, CommerceError> {
        let outcome = self.cart.add_item(item);
        if outcome.is_accepted() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Remove a line and persist.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<bool, CommerceError> {
        let removed = self.cart.remove_item(product_id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Empty the cart and purge the durable copy.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.cart.clear();
        self.storage.remove(CART_STORAGE_KEY)
    }

    /// Replace the whole cart with a single item from another vendor.
    /// Backs the "replace cart" choice after a vendor conflict.
    pub fn replace_with(&mut self, item: CartItem) -> Result<(), CommerceError> {
        self.cart.clear();
        self.cart.add_item(item);
        self.persist()
    }

    /// The current cart contents.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of item prices.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Number of lines.
    pub fn item_count(&self) -> usize {
        self.cart.item_count()
    }

    fn persist(&self) -> Result<(), CommerceError> {
        let stored = StoredCart::from_cart(&self.cart);
        let raw = serde_json::to_string(&stored)?;
        self.storage.set(CART_STORAGE_KEY, &raw)
    }
}

/// In-memory device storage for tests and development.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CommerceError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CommerceError::StorageError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CommerceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CommerceError::StorageError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CommerceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CommerceError::StorageError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

impl DeviceStorage for &MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CommerceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CommerceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CommerceError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Condition;
    use crate::ids::VendorId;

    fn item(product: &str, vendor: &str, price: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: format!("Item {}", product),
            price: Money::clp(price),
            image_url: String::new(),
            condition: Condition::Excellent,
            vendor_id: VendorId::new(vendor),
            vendor_name: format!("Vendor {}", vendor),
        }
    }

    #[test]
    fn test_mutations_are_mirrored_to_storage() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage);
        store.add_item(item("p1", "v1", 10000)).unwrap();

        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        let stored: StoredCart = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.vendor_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_persisted_shape_uses_camel_case_vendor_keys() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage);
        store.add_item(item("p1", "v1", 10000)).unwrap();

        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""vendorId":"v1""#));
        assert!(raw.contains(r#""vendorName":"Vendor v1""#));

        // The same keys rehydrate.
        let reopened = CartStore::open(&storage);
        assert_eq!(reopened.cart().vendor().map(|v| v.id.as_str()), Some("v1"));
    }

    #[test]
    fn test_reopen_rehydrates() {
        let storage = MemoryStorage::new();
        {
            let mut store = CartStore::open(&storage);
            store.add_item(item("p1", "v1", 10000)).unwrap();
            store.add_item(item("p2", "v1", 5000)).unwrap();
        }

        let store = CartStore::open(&storage);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total().amount, 15000);
        assert_eq!(store.cart().vendor().map(|v| v.id.as_str()), Some("v1"));
    }

    #[test]
    fn test_clear_purges_durable_copy() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage);
        store.add_item(item("p1", "v1", 10000)).unwrap();
        store.clear().unwrap();

        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
        assert!(CartStore::open(&storage).cart().is_empty());
    }

    #[test]
    fn test_replace_with_swaps_vendor() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage);
        store.add_item(item("p1", "v1", 10000)).unwrap();

        let conflicting = item("p2", "v2", 8000);
        assert_eq!(
            store.add_item(conflicting.clone()).unwrap(),
            AddOutcome::VendorConflict
        );
        store.replace_with(conflicting).unwrap();

        assert_eq!(store.item_count(), 1);
        assert_eq!(store.cart().vendor().map(|v| v.id.as_str()), Some("v2"));
    }

    #[test]
    fn test_unknown_fields_and_missing_fields_tolerated() {
        let storage = MemoryStorage::new();
        // Older schema: no vendor fields. Newer schema: extra field.
        storage
            .set(
                CART_STORAGE_KEY,
                r#"{"items":[],"schema_version":2}"#,
            )
            .unwrap();
        let store = CartStore::open(&storage);
        assert!(store.cart().is_empty());
    }
}
