//! Authentication API Endpoints
//! Mission: Login, current-customer lookup and admin-gated customer management

use crate::app::AppState;
use crate::auth::{
    middleware::{AdminCustomer, CurrentCustomer},
    models::{CustomerDraft, CustomerResponse, LoginRequest, TokenResponse},
    password::PasswordHasher,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{JsonBody, PathId};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let Some(customer) = state.customers.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "Failed login attempt");
        return Err(ApiError::InvalidCredentials);
    };

    let valid = verify_password(state.hasher, payload.password, customer.password_hash.clone())
        .await?;
    if !valid {
        warn!(email = %payload.email, "Failed login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let tokens = state.guard.tokens();
    let access_token = tokens.issue_access_token(&customer.email)?;

    info!(customer_id = customer.customer_id, "Login successful");

    Ok(Json(TokenResponse::bearer(
        access_token,
        tokens.access_ttl().num_seconds(),
    )))
}

/// Current customer - GET /api/auth/me
pub async fn me(CurrentCustomer(customer): CurrentCustomer) -> Json<CustomerResponse> {
    Json(CustomerResponse::from(&customer))
}

/// List customers - GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
    CurrentCustomer(_): CurrentCustomer,
) -> ApiResult<Json<Vec<CustomerResponse>>> {
    let customers = state.customers.list().await?;
    Ok(Json(customers.iter().map(CustomerResponse::from).collect()))
}

/// Get one customer - GET /api/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    CurrentCustomer(_): CurrentCustomer,
    PathId(customer_id): PathId,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = state.customers.get(customer_id).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Create customer - POST /api/customers (Admin only)
pub async fn create_customer(
    State(state): State<AppState>,
    AdminCustomer(admin): AdminCustomer,
    JsonBody(draft): JsonBody<CustomerDraft>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    draft.validate().map_err(ApiError::Validation)?;

    let password_hash = hash_password(state.hasher, draft.password.clone()).await?;
    let customer = state.customers.insert(&draft, &password_hash).await?;

    info!(
        by = admin.customer_id,
        customer_id = customer.customer_id,
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// Replace customer - PUT /api/customers/:id (Admin only)
pub async fn update_customer(
    State(state): State<AppState>,
    AdminCustomer(admin): AdminCustomer,
    PathId(customer_id): PathId,
    JsonBody(draft): JsonBody<CustomerDraft>,
) -> ApiResult<Json<CustomerResponse>> {
    draft.validate().map_err(ApiError::Validation)?;

    let password_hash = hash_password(state.hasher, draft.password.clone()).await?;
    let customer = state
        .customers
        .update(customer_id, &draft, &password_hash)
        .await?;

    info!(by = admin.customer_id, customer_id, "Customer updated");

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Delete customer - DELETE /api/customers/:id (Admin only)
pub async fn delete_customer(
    State(state): State<AppState>,
    AdminCustomer(admin): AdminCustomer,
    PathId(customer_id): PathId,
) -> ApiResult<StatusCode> {
    // Don't allow deleting yourself
    if admin.customer_id == customer_id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.customers.delete(customer_id).await?;

    info!(by = admin.customer_id, customer_id, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_password(hasher: PasswordHasher, plaintext: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)
}

async fn verify_password(
    hasher: PasswordHasher,
    plaintext: String,
    password_hash: String,
) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &password_hash))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))
}
