//! Category types.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A browsing category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Emoji or icon token shown next to the name.
    pub icon: Option<String>,
}

impl Category {
    /// Create a new category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            icon: None,
        }
    }
}
