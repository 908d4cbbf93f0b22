//! Authentication and user profiles for REDY.
//!
//! The marketplace never reads ambient session state: callers resolve the
//! current identity through an [`AuthProvider`] and pass it into domain
//! operations explicitly.

pub mod error;
pub mod profile;
pub mod user;

pub use error::AuthError;
pub use profile::Profile;
pub use user::{AuthProvider, Identity, Role, StaticAuth};
