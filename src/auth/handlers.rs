// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::users::{LoginRequest, LoginResponse};
use crate::AppState;

/// Exchange email and password for a signed token
/// POST /user/login
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.users.login(request).await?;
    tracing::debug!("Issued token");
    Ok(Json(response))
}
