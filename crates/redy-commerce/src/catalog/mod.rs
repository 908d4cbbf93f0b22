//! Product catalog types.

mod category;
mod product;

pub use category::Category;
pub use product::{ApprovalStatus, Condition, Product};
