//! Identities, roles, and the auth provider seam.

use crate::error::AuthError;
use async_trait::async_trait;
use redy_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// Role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can browse and purchase.
    #[default]
    Buyer,
    /// Can list products for sale.
    Seller,
    /// Can review listings and see marketplace stats.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID.
    pub user_id: UserId,
    /// Account email.
    pub email: String,
}

/// Source of the current authenticated identity.
///
/// Domain operations take the resolved identity as a parameter; this
/// trait is the one place session state is read.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The current identity, or None when signed out.
    async fn current_user(&self) -> Result<Option<Identity>, AuthError>;
}

/// Fixed-identity provider for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    identity: Option<Identity>,
}

impl StaticAuth {
    /// A provider with no session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A provider that always resolves the given user.
    pub fn signed_in(user_id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                user_id: user_id.into(),
                email: email.into(),
            }),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_auth_signed_in() {
        let auth = StaticAuth::signed_in("u1", "ana@example.cl");
        let identity = auth.current_user().await.unwrap().unwrap();
        assert_eq!(identity.user_id.as_str(), "u1");
        assert_eq!(identity.email, "ana@example.cl");
    }

    #[tokio::test]
    async fn test_static_auth_signed_out() {
        let auth = StaticAuth::signed_out();
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Buyer, Role::Seller, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
    }
}
