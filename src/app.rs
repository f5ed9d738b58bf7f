//! Application state and router

use crate::auth::{
    api as auth_api, auth_middleware, AccessGuard, CustomerStore, PasswordHasher, TokenService,
};
use crate::catalog::{api as catalog_api, CityStore};
use crate::db::{Database, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_logging;
use anyhow::Context;
use axum::{
    extract::{FromRef, State},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub customers: CustomerStore,
    pub cities: CityStore,
    pub guard: AccessGuard,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Open the stores on `db` and wire the guard to the customer table
    pub async fn new(
        db: Database,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Result<Self, StoreError> {
        let customers = CustomerStore::new(db.clone()).await?;
        let cities = CityStore::new(db.clone()).await?;
        let guard = AccessGuard::new(Arc::new(tokens), Arc::new(customers.clone()));

        Ok(Self {
            db,
            customers,
            cities,
            guard,
            hasher,
        })
    }

    /// Seed an admin when none exists. Returns whether one was created.
    pub async fn seed_bootstrap_admin(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        let hasher = self.hasher;
        let plaintext = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .context("Password hashing task failed")??;

        Ok(self.customers.ensure_admin(email, &password_hash).await?)
    }
}

impl FromRef<AppState> for AccessGuard {
    fn from_ref(state: &AppState) -> Self {
        state.guard.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    // Every route here needs a valid bearer token
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth_api::me))
        .route(
            "/api/customers",
            get(auth_api::list_customers).post(auth_api::create_customer),
        )
        .route(
            "/api/customers/:id",
            get(auth_api::get_customer)
                .put(auth_api::update_customer)
                .delete(auth_api::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(
            state.guard.clone(),
            auth_middleware,
        ));

    // Reads are public; mutations authenticate through `AdminCustomer`
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth_api::login))
        .route(
            "/api/cities",
            get(catalog_api::list_cities).post(catalog_api::create_city),
        )
        .route(
            "/api/cities/:id",
            get(catalog_api::get_city)
                .put(catalog_api::update_city)
                .delete(catalog_api::delete_city),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.db.ping().await?;
    Ok("ok")
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
