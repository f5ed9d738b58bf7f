//! Access Guard
//! Mission: Resolve bearer tokens to customers and gate admin-only operations

use crate::auth::jwt::TokenService;
use crate::auth::models::Customer;
use crate::db::StoreError;
use async_trait::async_trait;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Shared message for every 401. Bad tokens and vanished accounts look the same to callers.
pub const CREDENTIALS_REJECTED_MESSAGE: &str = "Could not validate credentials";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Only an admin can add, change or delete records";

/// Lookup the guard needs from persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError>;
}

#[derive(Debug, Error)]
pub enum GuardError {
    /// 401: missing, malformed, foreign, expired, or orphaned token
    #[error("credentials rejected")]
    CredentialsRejected,
    /// 403: authenticated but not an admin
    #[error("admin access required")]
    Forbidden,
    /// 500: the credential store failed for this request
    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        match self {
            GuardError::CredentialsRejected => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": CREDENTIALS_REJECTED_MESSAGE })),
            )
                .into_response(),
            GuardError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": ADMIN_REQUIRED_MESSAGE })),
            )
                .into_response(),
            GuardError::Store(e) => {
                error!(error = %e, "Credential store failed during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Verifies tokens and loads the principal they name
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenService>,
    store: Arc<dyn CredentialStore>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, store }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Verify the token, then load the customer it names.
    pub async fn authenticate(&self, token: &str) -> Result<Customer, GuardError> {
        let subject = self.tokens.verify(token).map_err(|e| {
            debug!(reason = %e, "Bearer token rejected");
            GuardError::CredentialsRejected
        })?;

        match self.store.find_by_email(&subject).await? {
            Some(customer) => Ok(customer),
            None => {
                debug!("Bearer token names no existing customer");
                Err(GuardError::CredentialsRejected)
            }
        }
    }

    /// Fail with `Forbidden` unless the customer is an admin.
    pub fn require_admin(customer: &Customer) -> Result<(), GuardError> {
        if customer.is_admin {
            Ok(())
        } else {
            debug!(customer_id = customer.customer_id, "Admin check failed");
            Err(GuardError::Forbidden)
        }
    }
}
