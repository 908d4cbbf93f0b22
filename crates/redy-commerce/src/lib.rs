//! Marketplace domain types and logic for REDY.
//!
//! This crate provides the core types of the REDY second-hand marketplace:
//!
//! - **Rut**: Chilean national-identifier formatting and checksum validation
//! - **Cart**: single-vendor shopping cart with device-local persistence
//! - **Checkout**: buyer form draft and the two-phase checkout stage machine
//! - **Order**: orders, order items, and the 15% commission split
//! - **Catalog**: products, approval status, categories
//!
//! # Example
//!
//! ```rust,ignore
//! use redy_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! let outcome = cart.add_item(item);
//! assert_eq!(outcome, AddOutcome::Added);
//!
//! let totals = OrderTotals::for_prices(cart.items().iter().map(|i| i.price));
//! println!("Total: {}", totals.total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod rut;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::rut;

    // Cart
    pub use crate::cart::{
        AddOutcome, Cart, CartItem, CartStore, DeviceStorage, MemoryStorage, StoredCart,
        VendorPin, CART_STORAGE_KEY,
    };

    // Checkout
    pub use crate::checkout::{BuyerDraft, CheckoutStage, ValidationErrors};

    // Order
    pub use crate::order::{
        CommissionSplit, Order, OrderItem, OrderStatus, OrderTotals, Transaction,
        TransactionStatus, COMMISSION_RATE_BASIS_POINTS,
    };

    // Catalog
    pub use crate::catalog::{ApprovalStatus, Category, Condition, Product};
}
