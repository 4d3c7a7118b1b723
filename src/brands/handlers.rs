// HTTP handlers for brand endpoints

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::{ValidationError, ValidationErrors};

use crate::brands::{Brand, CreateBrandRequest, UpdateBrandRequest};
use crate::error::ApiError;
use crate::extract::{parse_id, ApiJson, ApiMultipart, ApiQuery};
use crate::pagination::{Page, PaginationParams};
use crate::AppState;

const RESOURCE: &str = "Brand";

/// Handler for GET /brand
pub async fn list_brands_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Page<Brand>>, ApiError> {
    let request = params.into_request()?;
    tracing::debug!("Fetching brands page {} (limit {})", request.page, request.limit);

    Ok(Json(state.brands.list(request).await?))
}

/// Handler for GET /brand/:id
pub async fn get_brand_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Brand>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(Json(state.brands.get(id).await?))
}

/// Handler for GET /brand/name/:name
/// Case-insensitive prefix search on the brand name
pub async fn find_brands_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Brand>>, ApiError> {
    Ok(Json(state.brands.find_by_name(&name).await?))
}

/// Handler for POST /brand
pub async fn create_brand_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBrandRequest>,
) -> Result<(StatusCode, Json<Brand>), ApiError> {
    let brand = state.brands.create(request).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// Handler for PUT /brand/:id
pub async fn update_brand_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateBrandRequest>,
) -> Result<Json<Brand>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(Json(state.brands.update(id, request).await?))
}

/// Handler for DELETE /brand/:id
pub async fn delete_brand_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Brand>, ApiError> {
    let id = parse_id(&id, RESOURCE)?;
    let brand = state.brands.delete(id).await?;

    tracing::info!("Deleted brand {}", brand.id);
    Ok(Json(brand))
}

/// Handler for POST /brand/logo-upload
///
/// Multipart form with a `logo` file and a `brandId` text field. The file is
/// stored before the brand is looked up and removed again when the brand does
/// not exist.
pub async fn upload_logo_handler(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<Brand>, ApiError> {
    let mut logo: Option<(String, Vec<u8>)> = None;
    let mut brand_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("logo") => {
                let file_name = field.file_name().unwrap_or("logo").to_string();
                let bytes = field.bytes().await?;
                logo = Some((file_name, bytes.to_vec()));
            }
            Some("brandId") => brand_id = Some(field.text().await?),
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let (file_name, bytes, brand_id) = match (logo, brand_id) {
        (Some((file_name, bytes)), Some(brand_id)) => (file_name, bytes, brand_id),
        (logo, brand_id) => {
            let mut errors = ValidationErrors::new();
            if logo.is_none() {
                errors.add("logo", required("A logo file is required"));
            }
            if brand_id.is_none() {
                errors.add("brandId", required("A brandId is required"));
            }
            return Err(errors.into());
        }
    };

    let stored = state.logos.store(&file_name, &bytes).await?;

    let id = match parse_id(brand_id.trim(), RESOURCE) {
        Ok(id) => id,
        Err(e) => {
            state.logos.discard(&stored).await;
            return Err(e);
        }
    };

    match state
        .brands
        .attach_logo(id, stored.to_string_lossy().into_owned())
        .await
    {
        Ok(brand) => {
            tracing::info!("Attached logo {} to brand {}", stored.display(), brand.id);
            Ok(Json(brand))
        }
        Err(e) => {
            state.logos.discard(&stored).await;
            Err(e)
        }
    }
}

fn required(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed(message));
    error
}
