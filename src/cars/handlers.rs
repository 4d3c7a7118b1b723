// HTTP handlers for car endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cars::{Car, CarDetails, CreateCarRequest, UpdateCarRequest};
use crate::error::ApiError;
use crate::extract::{parse_id, ApiJson, ApiQuery};
use crate::pagination::{Page, PaginationParams};
use crate::AppState;

const RESOURCE: &str = "Car";

/// Handler for GET /car
/// Lists cars with brand and owner expanded
pub async fn list_cars_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Page<CarDetails>>, ApiError> {
    let request = params.into_request()?;
    tracing::debug!("Fetching cars page {} (limit {})", request.page, request.limit);

    Ok(Json(state.cars.list(request).await?))
}

/// Handler for GET /car/:id
pub async fn get_car_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarDetails>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(Json(state.cars.get(id).await?))
}

/// Handler for POST /car
pub async fn create_car_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCarRequest>,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let car = state.cars.create(request).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// Handler for PUT /car/:id
pub async fn update_car_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateCarRequest>,
) -> Result<Json<Car>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(Json(state.cars.update(id, request).await?))
}

/// Handler for DELETE /car/:id
/// Returns the deleted car
pub async fn delete_car_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    let car = state.cars.delete(id).await?;

    tracing::info!("Deleted car {}", car.id);
    Ok(Json(car))
}
