//! Cart and line item types.

use crate::catalog::Condition;
use crate::ids::{ProductId, VendorId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line in the cart. One listing is one unit, so there is no quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Listed price.
    pub price: Money,
    /// Primary image URL.
    pub image_url: String,
    /// Product condition.
    pub condition: Condition,
    /// Selling vendor.
    pub vendor_id: VendorId,
    /// Vendor display name.
    pub vendor_name: String,
}

/// The single vendor a non-empty cart is locked to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorPin {
    /// Vendor ID all items must share.
    pub id: VendorId,
    /// Vendor display name.
    pub name: String,
}

/// Result of attempting to add an item to the cart.
///
/// A cross-vendor conflict is a defined alternate outcome rather than an
/// error: the caller is expected to offer the user a choice between
/// keeping the current cart and replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Item appended; vendor pinned if the cart was empty.
    Added,
    /// Product was already in the cart; treated as success.
    AlreadyInCart,
    /// Item belongs to a different vendor than the pinned one; rejected.
    VendorConflict,
}

impl AddOutcome {
    /// Whether the item ended up in the cart.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, AddOutcome::VendorConflict)
    }
}

/// A shopping cart holding items from a single vendor.
///
/// Invariant: all items in a non-empty cart share the same vendor, and
/// the vendor pin is `None` iff the cart is empty. The invariant is
/// enforced at insertion time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    vendor: Option<VendorPin>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted parts. Drops a vendor pin with no
    /// items, and derives a missing pin from the first item.
    pub fn from_parts(items: Vec<CartItem>, vendor: Option<VendorPin>) -> Self {
        let vendor = if items.is_empty() {
            None
        } else {
            vendor.or_else(|| {
                items.first().map(|item| VendorPin {
                    id: item.vendor_id.clone(),
                    name: item.vendor_name.clone(),
                })
            })
        };
        Self { items, vendor }
    }

    /// Add an item, enforcing the single-vendor invariant.
    pub fn add_item(&mut self, item: CartItem) -> AddOutcome {
        match &self.vendor {
            None => {
                self.vendor = Some(VendorPin {
                    id: item.vendor_id.clone(),
                    name: item.vendor_name.clone(),
                });
                self.items.push(item);
                AddOutcome::Added
            }
            Some(pin) if pin.id != item.vendor_id => AddOutcome::VendorConflict,
            Some(_) => {
                if self.items.iter().any(|i| i.product_id == item.product_id) {
                    AddOutcome::AlreadyInCart
                } else {
                    self.items.push(item);
                    AddOutcome::Added
                }
            }
        }
    }

    /// Remove the line with the given product. Clears the vendor pin when
    /// the last item goes, so a different vendor can be added next.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if self.items.is_empty() {
            self.vendor = None;
        }
        removed
    }

    /// Empty the cart and clear the vendor pin.
    pub fn clear(&mut self) {
        self.items.clear();
        self.vendor = None;
    }

    /// Sum of item prices. No tax or shipping is modeled.
    pub fn total(&self) -> Money {
        Money::try_sum(self.items.iter().map(|i| &i.price), Currency::CLP)
            .unwrap_or_else(|| Money::zero(Currency::CLP))
    }

    /// Number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The pinned vendor, if any.
    pub fn vendor(&self) -> Option<&VendorPin> {
        self.vendor.as_ref()
    }
}
