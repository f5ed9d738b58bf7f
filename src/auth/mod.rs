//! Authentication Module
//! Mission: Bearer-token access to the API with admin-gated mutations

pub mod api;
pub mod customer_store;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use customer_store::CustomerStore;
pub use guard::{AccessGuard, CredentialStore, GuardError};
pub use jwt::{TokenError, TokenService};
pub use middleware::auth_middleware;
pub use password::PasswordHasher;
