//! Datastore abstraction for REDY.
//!
//! The [`Datastore`] trait is the persistence seam: the checkout and
//! approval pipelines run against it, and [`MemoryStore`] backs tests and
//! local development.

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{Datastore, ProductFilter};
