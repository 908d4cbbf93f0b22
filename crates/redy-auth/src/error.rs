//! Auth error types.

use thiserror::Error;

/// Errors that can occur resolving identities and profiles.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No authenticated session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Profile missing for an authenticated user.
    #[error("Profile not found for user: {0}")]
    ProfileNotFound(String),

    /// Operation requires a role the user does not have.
    #[error("Requires {required} role")]
    Forbidden { required: String },

    /// Underlying provider failure.
    #[error("Auth provider error: {0}")]
    Provider(String),
}
