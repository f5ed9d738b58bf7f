//! Authentication Middleware
//! Mission: Protect API endpoints with bearer-token validation

use crate::auth::guard::{AccessGuard, GuardError};
use crate::auth::models::Customer;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Auth middleware that resolves `Authorization: Bearer <token>` to a customer
pub async fn auth_middleware(
    State(guard): State<AccessGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, GuardError> {
    let token = bearer_token(req.headers())
        .map(str::to_owned)
        .ok_or(GuardError::CredentialsRejected)?;
    let customer = guard.authenticate(&token).await?;

    // Handlers pick this up through `CurrentCustomer` / `AdminCustomer`
    req.extensions_mut().insert(customer);

    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization` header. The scheme match is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Authenticated customer.
///
/// Reuses the customer `auth_middleware` already loaded, otherwise authenticates
/// the request's bearer token itself.
pub struct CurrentCustomer(pub Customer);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentCustomer
where
    AccessGuard: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(customer) = parts.extensions.get::<Customer>() {
            return Ok(CurrentCustomer(customer.clone()));
        }

        let token = bearer_token(&parts.headers)
            .map(str::to_owned)
            .ok_or(GuardError::CredentialsRejected)?;
        let customer = AccessGuard::from_ref(state).authenticate(&token).await?;
        parts.extensions.insert(customer.clone());

        Ok(CurrentCustomer(customer))
    }
}

/// Authenticated customer who also passed the admin check
pub struct AdminCustomer(pub Customer);

#[async_trait]
impl<S> FromRequestParts<S> for AdminCustomer
where
    AccessGuard: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentCustomer(customer) = CurrentCustomer::from_request_parts(parts, state).await?;
        AccessGuard::require_admin(&customer)?;
        Ok(AdminCustomer(customer))
    }
}
