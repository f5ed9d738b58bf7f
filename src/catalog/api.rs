//! City API Endpoints

use crate::app::AppState;
use crate::auth::middleware::AdminCustomer;
use crate::catalog::{City, CityDraft};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{JsonBody, PathId};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

/// GET /api/cities
pub async fn list_cities(State(state): State<AppState>) -> ApiResult<Json<Vec<City>>> {
    Ok(Json(state.cities.list().await?))
}

/// GET /api/cities/:id
pub async fn get_city(
    State(state): State<AppState>,
    PathId(city_id): PathId,
) -> ApiResult<Json<City>> {
    Ok(Json(state.cities.get(city_id).await?))
}

/// POST /api/cities (Admin only)
pub async fn create_city(
    State(state): State<AppState>,
    AdminCustomer(_): AdminCustomer,
    JsonBody(draft): JsonBody<CityDraft>,
) -> ApiResult<(StatusCode, Json<City>)> {
    draft.validate().map_err(ApiError::Validation)?;
    let city = state.cities.insert(&draft).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// PUT /api/cities/:id (Admin only)
pub async fn update_city(
    State(state): State<AppState>,
    AdminCustomer(_): AdminCustomer,
    PathId(city_id): PathId,
    JsonBody(draft): JsonBody<CityDraft>,
) -> ApiResult<Json<City>> {
    draft.validate().map_err(ApiError::Validation)?;
    Ok(Json(state.cities.update(city_id, &draft).await?))
}

/// DELETE /api/cities/:id (Admin only)
pub async fn delete_city(
    State(state): State<AppState>,
    AdminCustomer(_): AdminCustomer,
    PathId(city_id): PathId,
) -> ApiResult<StatusCode> {
    state.cities.delete(city_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
