// HTTP handlers for user endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::extract::{parse_id, ApiJson, ApiQuery};
use crate::pagination::{Page, PaginationParams};
use crate::users::{CreateUserRequest, UpdateUserRequest, UserResponse, UserWithCars};
use crate::AppState;

const RESOURCE: &str = "User";

/// Handler for POST /user
/// Registers a user, the response never carries the password
pub async fn signup_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.signup(request).await?;
    tracing::info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /user
pub async fn list_users_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let request = params.into_request()?;
    tracing::debug!("Fetching users page {} (limit {})", request.page, request.limit);

    Ok(Json(state.users.list(request).await?))
}

/// Handler for GET /user/:id
/// Includes the cars owned by the user
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserWithCars>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(Json(state.users.get(id).await?))
}

/// Handler for PUT /user/:id (requires a valid token)
///
/// Any authenticated caller may update any user.
pub async fn update_user_handler(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    let user = state.users.update(id, request).await?;

    tracing::info!("User {} updated user {}", caller.id, user.id);
    Ok(Json(user))
}

/// Handler for DELETE /user/:id (requires a valid token)
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    let user = state.users.delete(id).await?;

    tracing::info!("User {} deleted user {}", caller.id, user.id);
    Ok(Json(user))
}
