//! Shopping cart with the single-vendor invariant and device-local
//! persistence.

mod cart;
mod store;

pub use cart::{AddOutcome, Cart, CartItem, VendorPin};
pub use store::{CartStore, DeviceStorage, MemoryStorage, StoredCart, CART_STORAGE_KEY};
