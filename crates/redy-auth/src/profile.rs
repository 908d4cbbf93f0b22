//! User profiles.

use crate::user::Role;
use redy_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// Stored profile for a registered user.
///
/// Buyer contact fields double as checkout form defaults. Seller fields
/// are only set for users with the `Seller` role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// User this profile belongs to.
    pub id: UserId,
    /// Role the user acts under.
    pub role: Role,
    /// Full name.
    pub full_name: Option<String>,
    /// RUT, normalized.
    pub rut: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Seller storefront name.
    pub store_name: Option<String>,
    /// Whether the seller has been verified by an admin.
    pub verified: bool,
}

impl Profile {
    /// Create a minimal profile with the given role.
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            full_name: None,
            rut: None,
            phone: None,
            region: None,
            city: None,
            address: None,
            store_name: None,
            verified: false,
        }
    }

    /// Display name for a seller: store name first, then full name, then
    /// the user ID.
    pub fn display_name(&self) -> &str {
        self.store_name
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_store_name() {
        let mut profile = Profile::new("u1", Role::Seller);
        assert_eq!(profile.display_name(), "u1");

        profile.full_name = Some("Ana Soto".to_string());
        assert_eq!(profile.display_name(), "Ana Soto");

        profile.store_name = Some("Bicicletas Ana".to_string());
        assert_eq!(profile.display_name(), "Bicicletas Ana");
    }
}
